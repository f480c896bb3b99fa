//! Class-shape conformance, property-tested over random value
//! populations.
//!
//! Valid populations mix constructed instances (members on the instance
//! or on the prototype), plain records, and callables carrying the
//! members; invalid populations are primitives and holders with
//! wrong-typed members. Every sample checks that the reusable predicate
//! and the immediate entry point agree.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use tsg_guard::{DefinitionInfo, GuardCompiler, MemberDecl, ObjectValue, TypeExpr, Value};

// -- Value strategies --

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::boolean),
        any::<f64>().prop_map(Value::number),
        ".{0,12}".prop_map(Value::string),
        any::<i64>().prop_map(|n| Value::bigint(n.into())),
        any::<u64>().prop_map(Value::symbol),
    ]
}

fn not_a_string() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::boolean),
        any::<f64>().prop_map(Value::number),
        any::<i64>().prop_map(|n| Value::bigint(n.into())),
        any::<u64>().prop_map(Value::symbol),
        Just(Value::function()),
        Just(Value::array(vec![])),
    ]
}

fn not_a_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::boolean),
        ".{0,12}".prop_map(Value::string),
        any::<i64>().prop_map(|n| Value::bigint(n.into())),
        any::<u64>().prop_map(Value::symbol),
        Just(Value::object(vec![])),
    ]
}

fn not_callable() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::boolean),
        any::<f64>().prop_map(Value::number),
        ".{0,12}".prop_map(Value::string),
        Just(Value::object(vec![])),
        Just(Value::array(vec![])),
    ]
}

/// The structurally-sufficient holder shapes for one required member:
/// a plain record, an instance with the member on the instance, an
/// instance with the member on the prototype, and a callable carrying
/// the member.
fn holder(name: &str, member: Value, shape: u8) -> Value {
    match shape % 4 {
        0 => Value::object(vec![(name, member)]),
        1 => Value::instance(vec![(name, member)], ObjectValue::record()),
        2 => Value::instance(vec![], ObjectValue::record().with(name, member)),
        _ => Value::callable_object(vec![(name, member)]),
    }
}

// -- Class fixtures --

/// class TypeReference1 { constructor(public property: string) {} }
fn property_class() -> (GuardCompiler, TypeExpr) {
    let compiler = GuardCompiler::new();
    let def = compiler.definitions().register(DefinitionInfo::class(
        "TypeReference1",
        vec![],
        vec![MemberDecl::property("property", TypeExpr::string())],
    ));
    (compiler, TypeExpr::named(def))
}

/// class TypeReference1 { method(): string { ... } }
fn method_class(asynchronous: bool) -> (GuardCompiler, TypeExpr) {
    let signature = if asynchronous {
        TypeExpr::async_function(vec![], TypeExpr::string())
    } else {
        TypeExpr::function(vec![], TypeExpr::string())
    };
    let compiler = GuardCompiler::new();
    let def = compiler.definitions().register(DefinitionInfo::class(
        "TypeReference1",
        vec![],
        vec![MemberDecl::method("method", signature)],
    ));
    (compiler, TypeExpr::named(def))
}

/// class TypeReference1<T> { constructor(public property: T) {} }
/// instantiated at T = number
fn generic_class_at_number() -> (GuardCompiler, TypeExpr) {
    let compiler = GuardCompiler::new();
    let def = compiler.definitions().register(DefinitionInfo::class(
        "TypeReference1",
        vec!["T"],
        vec![MemberDecl::property("property", TypeExpr::param("T"))],
    ));
    (compiler, TypeExpr::instantiated(def, vec![TypeExpr::number()]))
}

fn assert_both_entry_points(
    compiler: &GuardCompiler,
    ty: &TypeExpr,
    value: &Value,
    expected: bool,
) -> Result<(), TestCaseError> {
    let guard = compiler.type_check_for(ty).expect("type builds");
    prop_assert_eq!(guard(value), expected, "predicate disagrees on {:?}", value);
    prop_assert_eq!(
        compiler.is_a(ty, value).expect("type builds"),
        expected,
        "entry points disagree on {:?}",
        value
    );
    Ok(())
}

// -- Properties --

proptest! {
    #[test]
    fn test_public_properties_accept_structural_matches(
        text in ".{0,12}",
        shape in 0u8..4,
    ) {
        let (compiler, ty) = property_class();
        let value = holder("property", Value::string(text), shape);
        assert_both_entry_points(&compiler, &ty, &value, true)?;
    }

    #[test]
    fn test_public_properties_reject_primitives(value in primitive()) {
        let (compiler, ty) = property_class();
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    #[test]
    fn test_public_properties_reject_wrong_member_type(
        member in not_a_string(),
        shape in 0u8..4,
    ) {
        let (compiler, ty) = property_class();
        let value = holder("property", member, shape);
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    #[test]
    fn test_public_methods_accept_any_callable_member(shape in 0u8..4) {
        let (compiler, ty) = method_class(false);
        let value = holder("method", Value::function(), shape);
        assert_both_entry_points(&compiler, &ty, &value, true)?;
    }

    #[test]
    fn test_public_methods_reject_non_callable_member(
        member in not_callable(),
        shape in 0u8..4,
    ) {
        let (compiler, ty) = method_class(false);
        let value = holder("method", member, shape);
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    #[test]
    fn test_public_methods_reject_primitives(value in primitive()) {
        let (compiler, ty) = method_class(false);
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    // Async-ness is never inspected: the asynchronous declaration accepts
    // and rejects exactly what the synchronous one does
    #[test]
    fn test_public_async_methods_accept_any_callable_member(shape in 0u8..4) {
        let (compiler, ty) = method_class(true);
        let value = holder("method", Value::function(), shape);
        assert_both_entry_points(&compiler, &ty, &value, true)?;
    }

    #[test]
    fn test_public_async_methods_reject_non_callable_member(
        member in not_callable(),
        shape in 0u8..4,
    ) {
        let (compiler, ty) = method_class(true);
        let value = holder("method", member, shape);
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    #[test]
    fn test_generic_properties_accept_any_number(
        number in prop_oneof![Just(f64::NAN), Just(7.0), any::<f64>()],
        shape in 0u8..4,
    ) {
        let (compiler, ty) = generic_class_at_number();
        let value = holder("property", Value::number(number), shape);
        assert_both_entry_points(&compiler, &ty, &value, true)?;
    }

    #[test]
    fn test_generic_properties_reject_wrong_member_type(
        member in not_a_number(),
        shape in 0u8..4,
    ) {
        let (compiler, ty) = generic_class_at_number();
        let value = holder("property", member, shape);
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }

    #[test]
    fn test_generic_properties_reject_primitives(value in primitive()) {
        let (compiler, ty) = generic_class_at_number();
        assert_both_entry_points(&compiler, &ty, &value, false)?;
    }
}

// Property initializers declare the member just like constructor
// assignment does; the structural contract is identical.
proptest! {
    #[test]
    fn test_property_initializers_accept_structural_matches(
        text in ".{0,12}",
        shape in 0u8..4,
    ) {
        let compiler = GuardCompiler::new();
        let def = compiler.definitions().register(DefinitionInfo::class(
            "TypeReference1",
            vec![],
            vec![MemberDecl::property("property", TypeExpr::string())],
        ));
        let ty = TypeExpr::named(def);
        let value = holder("property", Value::string(text), shape);
        assert_both_entry_points(&compiler, &ty, &value, true)?;
    }
}
