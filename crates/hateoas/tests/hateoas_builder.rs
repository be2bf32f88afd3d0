mod common;

use std::sync::Arc;

use hateoas::metadata::MetadataCache;
use hateoas::{
    Format, HateoasBuilder, HateoasConfig, HateoasError, MetadataLoadError, SerializationContext, TemplateUrlGenerator,
    UrlGenerationError,
};
use hateoas_support::{ClassInfo, Property, Relation, Resource, Route, Value};

use common::*;

fn adrien_brault(class: &'static ClassInfo) -> Value {
    Value::object(AdrienBrault::new(class))
}

const ADRIEN_BRAULT_JSON: &str = concat!(
    r#"{"first_name":"Adrien","last_name":"Brault","#,
    r#""_links":{"self":{"href":"http://adrienbrault.fr"},"computer":{"href":"http://www.apple.com/macbook-pro/"},"broken-computer":{"href":"http://www.dell.com/"}},"#,
    r#""_embedded":{"computer":{"name":"MacBook Pro"},"smartphone":{"name":"iPhone 6"}}}"#
);

#[test]
fn test_serialize_links_of_active_group_xml() {
    let hateoas = HateoasBuilder::build_hateoas();
    let xml = hateoas
        .serialize(
            adrien_brault(&ADRIEN_BRAULT),
            Format::Xml,
            Some(SerializationContext::new().with_groups(["simple"])),
        )
        .unwrap();

    assert_eq!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <first_name><![CDATA[Adrien]]></first_name>
  <last_name><![CDATA[Brault]]></last_name>
  <link rel="self" href="http://adrienbrault.fr"/>
  <link rel="computer" href="http://www.apple.com/macbook-pro/"/>
</result>
"#
    );
}

#[test]
fn test_serialize_links_of_active_group_json() {
    let hateoas = HateoasBuilder::build_hateoas();
    let json = hateoas
        .serialize(
            adrien_brault(&ADRIEN_BRAULT),
            Format::Json,
            Some(SerializationContext::new().with_groups(["simple"])),
        )
        .unwrap();

    assert_eq!(
        json,
        r#"{"first_name":"Adrien","last_name":"Brault","_links":{"self":{"href":"http://adrienbrault.fr"},"computer":{"href":"http://www.apple.com/macbook-pro/"}}}"#
    );
}

#[test]
fn test_serialize_all_relations() {
    let hateoas = HateoasBuilder::build_hateoas();
    let json = hateoas
        .serialize(adrien_brault(&ADRIEN_BRAULT), Format::Json, None)
        .unwrap();
    assert_eq!(json, ADRIEN_BRAULT_JSON);
}

#[test]
fn test_annotations_match_attributes() {
    let hateoas = HateoasBuilder::build_hateoas();
    for class in [&ADRIEN_BRAULT_ANNOTATED, &ADRIEN_BRAULT_SPLIT] {
        let json = hateoas.serialize(adrien_brault(class), Format::Json, None).unwrap();
        assert_eq!(json, ADRIEN_BRAULT_JSON, "{}", class.name());
    }
}

#[test]
fn test_metadata_sources_can_be_disabled() {
    let hateoas = HateoasBuilder::new().include_annotation_metadata(false).build();
    let json = hateoas
        .serialize(adrien_brault(&ADRIEN_BRAULT_SPLIT), Format::Json, None)
        .unwrap();
    assert_eq!(
        json,
        r#"{"first_name":"Adrien","last_name":"Brault","_links":{"self":{"href":"http://adrienbrault.fr"},"computer":{"href":"http://www.apple.com/macbook-pro/"}},"_embedded":{"computer":{"name":"MacBook Pro"}}}"#
    );

    let hateoas = HateoasBuilder::new().include_attribute_metadata(false).build();
    let json = hateoas
        .serialize(adrien_brault(&ADRIEN_BRAULT_SPLIT), Format::Json, None)
        .unwrap();
    assert_eq!(
        json,
        r#"{"first_name":"Adrien","last_name":"Brault","_links":{"broken-computer":{"href":"http://www.dell.com/"}},"_embedded":{"smartphone":{"name":"iPhone 6"}}}"#
    );
}

#[test]
fn test_exclude_if() {
    let hateoas = HateoasBuilder::build_hateoas();
    let mut someone_else = AdrienBrault::new(&ADRIEN_BRAULT);
    someone_else.first_name = "William".to_string();

    let json = hateoas
        .serialize(
            Value::object(someone_else),
            Format::Json,
            Some(SerializationContext::new().with_groups(["simple"])),
        )
        .unwrap();
    assert_eq!(
        json,
        r#"{"first_name":"William","last_name":"Brault","_links":{"computer":{"href":"http://www.apple.com/macbook-pro/"}}}"#
    );
}

#[test]
fn test_cyclic_embeds_xml() {
    let (reference1, _reference2) = circular_references();
    let xml = HateoasBuilder::build_hateoas()
        .serialize(reference1.clone(), Format::Xml, None)
        .unwrap();
    release(&reference1);

    assert_eq!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
  <name><![CDATA[reference1]]></name>
  <entry rel="reference2">
    <name><![CDATA[reference2]]></name>
    <entry rel="reference1"/>
  </entry>
</result>
"#
    );
}

#[test]
fn test_cyclic_embeds_json() {
    let (reference1, _reference2) = circular_references();
    let json = HateoasBuilder::build_hateoas()
        .serialize(reference1.clone(), Format::Json, None)
        .unwrap();
    release(&reference1);

    assert_eq!(
        json,
        r#"{"name":"reference1","_embedded":{"reference2":{"name":"reference2","_embedded":{}}}}"#
    );
}

#[test]
fn test_cyclic_embeds_json_with_serialize_null() {
    let (reference1, _reference2) = circular_references();
    let json = HateoasBuilder::build_hateoas()
        .serialize(
            reference1.clone(),
            Format::Json,
            Some(SerializationContext::new().with_serialize_null(true)),
        )
        .unwrap();
    release(&reference1);

    assert_eq!(
        json,
        r#"{"name":"reference1","_embedded":{"reference2":{"name":"reference2","_embedded":{"reference1":null}}}}"#
    );
}

#[test]
fn test_cyclic_embeds_xml_with_serialize_null() {
    let (reference1, _reference2) = circular_references();
    let xml = HateoasBuilder::build_hateoas()
        .serialize(
            reference1.clone(),
            Format::Xml,
            Some(SerializationContext::new().with_serialize_null(true)),
        )
        .unwrap();
    release(&reference1);

    assert!(xml.contains(r#"<entry rel="reference1"/>"#));
    assert!(!xml.contains("xsi:nil"));
}

#[test]
fn test_null_embed_with_serialize_null() {
    let hateoas = HateoasBuilder::build_hateoas();
    let context = SerializationContext::new().with_serialize_null(true);

    let xml = hateoas
        .serialize(circular_reference_1(), Format::Xml, Some(context.clone()))
        .unwrap();
    assert!(xml.contains(r#"<result xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#));
    assert!(xml.contains(r#"<entry rel="reference2" xsi:nil="true"/>"#));

    let json = hateoas
        .serialize(circular_reference_1(), Format::Json, Some(context))
        .unwrap();
    assert_eq!(json, r#"{"name":"reference1","_embedded":{"reference2":null}}"#);
}

#[test]
fn test_null_embed_without_serialize_null() {
    let hateoas = HateoasBuilder::build_hateoas();

    let json = hateoas.serialize(circular_reference_1(), Format::Json, None).unwrap();
    assert_eq!(json, r#"{"name":"reference1","_embedded":{}}"#);

    let xml = hateoas.serialize(circular_reference_1(), Format::Xml, None).unwrap();
    assert!(xml.contains(r#"<entry rel="reference2"/>"#));
    assert!(!xml.contains("xsi:nil"));
}

#[test]
fn test_xml_metadata_file() {
    let hateoas = HateoasBuilder::new()
        .add_metadata_dir_with_prefix(fixtures_dir().join("xml"), "fixtures")
        .set_default_url_generator(TemplateUrlGenerator::new().with_route("user_get", "/users/{id}"))
        .build();

    let xml = hateoas
        .serialize(Value::object(NoAnnotations { id: 42, number: 303 }), Format::Xml, None)
        .unwrap();
    assert_eq!(
        xml,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<resource>
  <id>42</id>
  <number>303</number>
  <link rel="self" href="id-42"/>
  <link rel="manager" href="/users/303" type="user"/>
</resource>
"#
    );

    let xml = hateoas
        .serialize(Value::object(NoAnnotations { id: 7, number: 1 }), Format::Xml, None)
        .unwrap();
    assert!(xml.contains(r#"<link rel="self" href="id-7"/>"#));
}

#[test]
fn test_yaml_metadata_file() {
    let hateoas = HateoasBuilder::new()
        .add_metadata_dir_with_prefix(fixtures_dir().join("yaml"), "fixtures")
        .set_default_url_generator(TemplateUrlGenerator::new().with_route("user_get", "/users/{id}"))
        .build();

    let json = hateoas
        .serialize(Value::object(NoAnnotations { id: 42, number: 303 }), Format::Json, None)
        .unwrap();
    assert_eq!(
        json,
        r#"{"id":42,"number":303,"_links":{"self":{"href":"id-42"},"manager":{"href":"/users/303","type":"user"}}}"#
    );
}

#[test]
fn test_alternative_url_generator() {
    let hateoas = HateoasBuilder::new()
        .set_url_generator("my_generator", TemplateUrlGenerator::new())
        .build();

    let xml = hateoas
        .serialize(Value::object(WithAlternativeRouter), Format::Xml, None)
        .unwrap();
    assert!(xml.contains(r#"<link rel="search" href="/search?query=hello"/>"#));
}

#[test]
fn test_missing_url_generator() {
    let hateoas = HateoasBuilder::build_hateoas();
    let err = hateoas
        .serialize(Value::object(WithAlternativeRouter), Format::Json, None)
        .unwrap_err();
    assert!(matches!(
        err,
        HateoasError::UrlGeneration(UrlGenerationError::UnknownGenerator(ref name)) if name == "my_generator"
    ));
}

#[test]
fn test_embed_max_depth() {
    let json = HateoasBuilder::build_hateoas()
        .serialize(Value::object(gh236_foo()), Format::Json, None)
        .unwrap();
    assert_eq!(json, r#"{"a":{"xxx":"yyy"},"_embedded":{"b_embed":{"xxx":"zzz"}}}"#);
}

#[test]
fn test_relation_provider_and_context_variable() {
    let hateoas = HateoasBuilder::new()
        .set_expression_context_variable("api", "/api")
        .add_relation_provider(|class: &'static ClassInfo| {
            if class == &COMPUTER {
                vec![Relation::new("self").with_href("expr(api ~ '/computers/' ~ object.name)")]
            } else {
                Vec::new()
            }
        })
        .build();

    let json = hateoas
        .serialize(Value::object(Computer::new("mbp")), Format::Json, None)
        .unwrap();
    assert_eq!(json, r#"{"name":"mbp","_links":{"self":{"href":"/api/computers/mbp"}}}"#);
}

#[test]
fn test_registered_expression_function() {
    let hateoas = HateoasBuilder::new()
        .register_expression_function("shout", |args: &[Value]| -> hateoas_expression::Result<Value> {
            Ok(Value::from(format!("{}!", args.first().map(Value::to_string).unwrap_or_default())))
        })
        .add_relation_provider(|class: &'static ClassInfo| {
            if class == &COMPUTER {
                vec![Relation::new("self").with_href("expr('/' ~ shout(object.name))")]
            } else {
                Vec::new()
            }
        })
        .build();

    let json = hateoas
        .serialize(Value::object(Computer::new("mbp")), Format::Json, None)
        .unwrap();
    assert_eq!(json, r#"{"name":"mbp","_links":{"self":{"href":"/mbp!"}}}"#);
}

static EMPTY_RELATION: ClassInfo =
    ClassInfo::new("fixtures::EmptyRelation").with_annotations(&[r#"@Hateoas\Relation("self")"#]);

struct EmptyRelation;

impl Resource for EmptyRelation {
    fn class(&self) -> &'static ClassInfo {
        &EMPTY_RELATION
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new("id", 1)]
    }
}

#[test]
fn test_invalid_metadata_aborts_serialization() {
    let err = HateoasBuilder::build_hateoas()
        .serialize(Value::object(EmptyRelation), Format::Json, None)
        .unwrap_err();
    assert!(matches!(
        err,
        HateoasError::MetadataLoad(MetadataLoadError::EmptyRelation { ref relation, .. }) if relation == "self"
    ));
}

#[test]
fn test_shared_metadata_cache() {
    let cache = Arc::new(MetadataCache::new());
    let first = HateoasBuilder::new().set_metadata_cache(cache.clone()).build();
    first
        .serialize(adrien_brault(&ADRIEN_BRAULT), Format::Json, None)
        .unwrap();
    assert!(cache.get("fixtures::AdrienBrault").is_some());

    let second = HateoasBuilder::new().set_metadata_cache(cache.clone()).build();
    let metadata = second.metadata_for_class(&ADRIEN_BRAULT).unwrap();
    assert_eq!(metadata.relations().len(), 4);
}

#[test]
fn test_shared_metadata_cache_keeps_first_load() {
    let cache = Arc::new(MetadataCache::new());
    let attributes_only = HateoasBuilder::new()
        .include_annotation_metadata(false)
        .set_metadata_cache(cache.clone())
        .build();
    assert!(attributes_only
        .metadata_for_class(&ADRIEN_BRAULT_SPLIT)
        .unwrap()
        .relations()
        .iter()
        .all(|relation| relation.name() != "smartphone"));

    let with_annotations = HateoasBuilder::new().set_metadata_cache(cache.clone()).build();
    let metadata = with_annotations.metadata_for_class(&ADRIEN_BRAULT_SPLIT).unwrap();
    assert_eq!(metadata.relations().len(), 2);

    cache.clear();
    let metadata = with_annotations.metadata_for_class(&ADRIEN_BRAULT_SPLIT).unwrap();
    assert_eq!(metadata.relations().len(), 4);
}

#[test]
fn test_serialize_is_repeatable() {
    let hateoas = HateoasBuilder::build_hateoas();
    let context = SerializationContext::new().with_groups(["Default"]);

    for format in [Format::Json, Format::Xml] {
        let first = hateoas
            .serialize(adrien_brault(&ADRIEN_BRAULT), format, Some(context.clone()))
            .unwrap();
        let second = hateoas
            .serialize(adrien_brault(&ADRIEN_BRAULT), format, Some(context.clone()))
            .unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_concurrent_serialization_with_cold_cache() {
    let cache = Arc::new(MetadataCache::new());
    let hateoas = HateoasBuilder::new().set_metadata_cache(cache.clone()).build();
    let hateoas = &hateoas;

    let outputs: Vec<(String, String)> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    let adrien = hateoas
                        .serialize(adrien_brault(&ADRIEN_BRAULT), Format::Json, None)
                        .unwrap();
                    let (reference1, _reference2) = circular_references();
                    let references = hateoas.serialize(reference1.clone(), Format::Json, None).unwrap();
                    release(&reference1);
                    (adrien, references)
                })
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    for (adrien, references) in &outputs {
        assert_eq!(adrien, ADRIEN_BRAULT_JSON);
        assert_eq!(
            references,
            r#"{"name":"reference1","_embedded":{"reference2":{"name":"reference2","_embedded":{}}}}"#
        );
    }
    // AdrienBrault, Computer and both circular reference classes
    assert_eq!(cache.len(), 4);
}

#[test]
fn test_relations_of_object() {
    let hateoas = HateoasBuilder::build_hateoas();
    let object = hateoas_support::ObjectRef::new(AdrienBrault::new(&ADRIEN_BRAULT));
    let resolved = hateoas
        .relations(&object, Some(&SerializationContext::new().with_groups(["simple"])))
        .unwrap();

    let rels: Vec<&str> = resolved.links.iter().map(|link| link.rel()).collect();
    assert_eq!(rels, ["self", "computer"]);
    assert!(resolved.embeddeds.is_empty());
}

static ABSOLUTE: ClassInfo = ClassInfo::new("fixtures::Absolute").with_attributes(absolute_relations);

fn absolute_relations() -> Vec<Relation> {
    vec![Relation::new("self").with_href(Route::new("/things").with_absolute(true))]
}

struct Absolute;

impl Resource for Absolute {
    fn class(&self) -> &'static ClassInfo {
        &ABSOLUTE
    }

    fn properties(&self) -> Vec<Property> {
        Vec::new()
    }
}

#[test]
fn test_from_config() {
    let config = HateoasConfig {
        metadata_dirs: vec![fixtures_dir().join("missing")],
        naming_strategy: "identical".to_string(),
        serialize_null: true,
        base_url: Some("https://api.example.com".to_string()),
        include_annotations: true,
    };
    let hateoas = HateoasBuilder::from_config(&config).build();

    let json = hateoas.serialize(Value::object(Absolute), Format::Json, None).unwrap();
    assert_eq!(json, r#"{"_links":{"self":{"href":"https://api.example.com/things"}}}"#);

    let json = hateoas.serialize(circular_reference_1(), Format::Json, None).unwrap();
    assert_eq!(json, r#"{"name":"reference1","_embedded":{"reference2":null}}"#);

    let json = hateoas
        .serialize(adrien_brault(&ADRIEN_BRAULT), Format::Json, Some(SerializationContext::new().with_groups(["simple"])))
        .unwrap();
    assert!(json.starts_with(r#"{"firstName":"Adrien","lastName":"Brault""#));
}
