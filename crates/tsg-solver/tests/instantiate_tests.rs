use super::*;
use crate::TypeInterner;
use crate::types::TypeId;

#[test]
fn test_substitution_basic() {
    let interner = TypeInterner::new();
    let t_name = interner.intern_string("T");
    let u_name = interner.intern_string("U");

    let mut subst = TypeSubstitution::new();

    // Initially empty
    assert!(subst.is_empty());
    assert_eq!(subst.len(), 0);

    // Add a substitution
    subst.insert(t_name, TypeId::STRING);
    assert_eq!(subst.get(t_name), Some(TypeId::STRING));
    assert_eq!(subst.get(u_name), None);
    assert_eq!(subst.len(), 1);
}

#[test]
fn test_substitution_from_args() {
    let interner = TypeInterner::new();
    let t_name = interner.intern_string("T");
    let u_name = interner.intern_string("U");
    let params = vec![t_name, u_name];
    let args = vec![TypeId::STRING, TypeId::NUMBER];

    let subst = TypeSubstitution::from_args(&params, &args);

    assert_eq!(subst.get(t_name), Some(TypeId::STRING));
    assert_eq!(subst.get(u_name), Some(TypeId::NUMBER));
    assert_eq!(subst.get(interner.intern_string("V")), None);
}

#[test]
fn test_substitution_rebinding_overwrites() {
    let interner = TypeInterner::new();
    let t_name = interner.intern_string("T");

    let mut subst = TypeSubstitution::new();
    subst.insert(t_name, TypeId::STRING);
    subst.insert(t_name, TypeId::NUMBER);

    assert_eq!(subst.get(t_name), Some(TypeId::NUMBER));
    assert_eq!(subst.len(), 1);
}
