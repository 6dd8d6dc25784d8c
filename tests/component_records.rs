//! Component record decoding
//!
//! The component query answers with fixed-shape records whose dimension
//! slots are captured verbatim rather than decoded.

use omc_codec::{CallError, Component, TypeName, classify_components, classify_value};

fn decode(reply: &str) -> Vec<Component> {
    classify_components(reply)
        .expect("well-formed component array")
        .expect("non-blank reply")
}

fn is_malformed(reply: &str) -> bool {
    matches!(
        classify_components(reply),
        Err(CallError::MalformedReply { .. })
    )
}

#[test]
fn decodes_reference_component() {
    let reply = r#"{{SomeClass, x, "a comment", "", true, false, false, true, "parameter", "", "input", {1, n}}}"#;
    let components = decode(reply);
    assert_eq!(components.len(), 1);

    let c = &components[0];
    assert_eq!(c.class_name, TypeName::parse("SomeClass").unwrap());
    assert_eq!(c.name, "x");
    assert_eq!(c.comment, "a comment");
    assert_eq!(c.protected, "");
    assert!(c.is_final);
    assert!(!c.is_flow);
    assert!(!c.is_stream);
    assert!(c.is_replaceable);
    assert_eq!(c.variability, "parameter");
    assert_eq!(c.inner_outer, "");
    assert_eq!(c.input_output, "input");
    assert_eq!(c.dimensions, vec!["1", "n"]);
    assert!(c.is_parameter());
    assert!(c.is_array());
}

#[test]
fn decodes_compiler_formatted_reply() {
    let reply = "{{Modelica.SIunits.Voltage,v,\"Voltage drop\", \"public\", false, false, false, false, \
                 \"\", \"none\", \"unspecified\", {}},\n\
                 {.Real,'quoted name',\"\", \"protected\", true, false, false, false, \
                 \"constant\", \"none\", \"output\", {size(x, 1) + 1, :}}}\n";
    let components = decode(reply);
    assert_eq!(components.len(), 2);

    assert_eq!(components[0].class_name.to_string(), "Modelica.SIunits.Voltage");
    assert!(components[0].dimensions.is_empty());
    assert!(!components[0].is_protected());

    assert!(components[1].class_name.is_rooted());
    assert_eq!(components[1].name, "'quoted name'");
    assert!(components[1].is_protected());
    assert_eq!(components[1].dimensions, vec!["size(x, 1) + 1", ":"]);
}

#[test]
fn empty_component_array() {
    assert!(decode("{}").is_empty());
    assert!(decode("  { }  ").is_empty());
}

#[test]
fn wrong_arity_is_rejected() {
    // eleven slots
    let short = r#"{{A, x, "", "", true, false, false, true, "", "", {}}}"#;
    assert!(is_malformed(short));
    // non-boolean flag
    let flag = r#"{{A, x, "", "", yes, false, false, true, "", "", "", {}}}"#;
    assert!(is_malformed(flag));
}

#[test]
fn entry_points_do_not_overlap() {
    let reply = r#"{{A, x, "", "", true, false, false, true, "", "", "", {1}}}"#;
    // As a generic value the dimension `{1}` is an array and the record is
    // a plain nested array.
    let generic = classify_value(reply).unwrap().expect("value");
    assert_eq!(generic.as_sequence().map(<[_]>::len), Some(1));
    // A generic array is not a component array.
    assert!(is_malformed("{1, 2}"));
}

#[test]
fn serializes_with_camel_case_fields() {
    let reply = r#"{{A.B, x, "", "public", false, true, false, false, "", "", "", {2}}}"#;
    let components = decode(reply);
    let json = serde_json::to_value(&components[0]).unwrap();
    assert_eq!(json["className"], "A.B");
    assert_eq!(json["isFlow"], true);
    assert_eq!(json["dimensions"][0], "2");
}
