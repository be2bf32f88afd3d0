#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use hateoas_support::{ClassInfo, Embedded, Exclusion, Property, Relation, Resource};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/config")
}

// Relations declared in code.

pub static ADRIEN_BRAULT: ClassInfo =
    ClassInfo::new("fixtures::AdrienBrault").with_attributes(adrien_brault_relations);

fn adrien_brault_relations() -> Vec<Relation> {
    let mut relations = adrien_brault_links();
    relations.extend(adrien_brault_embeds());
    relations
}

fn adrien_brault_links() -> Vec<Relation> {
    vec![
        Relation::new("self").with_href("http://adrienbrault.fr").with_exclusion(
            Exclusion::new()
                .with_groups(["Default", "simple"])
                .exclude_if("expr(object.firstName !== 'Adrien' || object.lastName !== 'Brault')"),
        ),
        Relation::new("computer")
            .with_href("http://www.apple.com/macbook-pro/")
            .with_exclusion(Exclusion::new().with_groups(["Default", "simple"]))
            .with_embedded(
                Embedded::new("expr(object.getMacbookPro())")
                    .with_exclusion(Exclusion::new().with_groups(["Default"])),
            ),
    ]
}

fn adrien_brault_embeds() -> Vec<Relation> {
    vec![
        Relation::new("broken-computer").with_href("http://www.dell.com/"),
        Relation::new("smartphone").with_embedded("expr(object.getSmartphone())"),
    ]
}

// The same relations as annotations.

const ADRIEN_BRAULT_LINK_ANNOTATIONS: &str = r#"/**
 * @Hateoas\Relation(
 *     "self",
 *     href = "http://adrienbrault.fr",
 *     exclusion = @Hateoas\Exclusion(
 *         groups = {"Default", "simple"},
 *         excludeIf = "expr(object.firstName !== 'Adrien' || object.lastName !== 'Brault')"
 *     )
 * )
 * @Hateoas\Relation(
 *     "computer",
 *     href = "http://www.apple.com/macbook-pro/",
 *     exclusion = @Hateoas\Exclusion(groups = {"Default", "simple"}),
 *     embedded = @Hateoas\Embedded(
 *         "expr(object.getMacbookPro())",
 *         exclusion = @Hateoas\Exclusion(groups = {"Default"})
 *     )
 * )
 */"#;

const ADRIEN_BRAULT_EMBED_ANNOTATIONS: &str = r#"/**
 * @Hateoas\Relation("broken-computer", href = "http://www.dell.com/")
 * @Hateoas\Relation("smartphone", embedded = "expr(object.getSmartphone())")
 */"#;

pub static ADRIEN_BRAULT_ANNOTATED: ClassInfo = ClassInfo::new("fixtures::AdrienBraultAnnotated")
    .with_annotations(&[ADRIEN_BRAULT_LINK_ANNOTATIONS, ADRIEN_BRAULT_EMBED_ANNOTATIONS]);

/// Links declared in code, embeds declared as annotations.
pub static ADRIEN_BRAULT_SPLIT: ClassInfo = ClassInfo::new("fixtures::AdrienBraultSplit")
    .with_attributes(adrien_brault_links)
    .with_annotations(&[ADRIEN_BRAULT_EMBED_ANNOTATIONS]);

pub struct AdrienBrault {
    pub class: &'static ClassInfo,
    pub first_name: String,
    pub last_name: String,
    pub macbook_pro: Arc<Computer>,
    pub smartphone: Arc<Computer>,
}

impl AdrienBrault {
    pub fn new(class: &'static ClassInfo) -> Self {
        Self {
            class,
            first_name: "Adrien".to_string(),
            last_name: "Brault".to_string(),
            macbook_pro: Arc::new(Computer::new("MacBook Pro")),
            smartphone: Arc::new(Computer::new("iPhone 6")),
        }
    }
}

impl Resource for AdrienBrault {
    fn class(&self) -> &'static ClassInfo {
        self.class
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("firstName", self.first_name.as_str()).groups(["Default", "simple"]),
            Property::new("lastName", self.last_name.as_str()).groups(["Default", "simple"]),
            Property::new("macbookPro", self.macbook_pro.clone()).excluded(),
            Property::new("smartphone", self.smartphone.clone()).excluded(),
        ]
    }
}

pub static COMPUTER: ClassInfo = ClassInfo::new("fixtures::Computer");

pub struct Computer {
    pub name: String,
}

impl Computer {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Resource for Computer {
    fn class(&self) -> &'static ClassInfo {
        &COMPUTER
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new("name", self.name.as_str())]
    }
}

// Two objects embedding each other.

pub static CIRCULAR_REFERENCE_1: ClassInfo =
    ClassInfo::new("fixtures::CircularReference1").with_attributes(circular_reference_1_relations);
pub static CIRCULAR_REFERENCE_2: ClassInfo =
    ClassInfo::new("fixtures::CircularReference2").with_attributes(circular_reference_2_relations);

fn circular_reference_1_relations() -> Vec<Relation> {
    vec![Relation::new("reference2").with_embedded("expr(object.getReference2())")]
}

fn circular_reference_2_relations() -> Vec<Relation> {
    vec![Relation::new("reference1").with_embedded("expr(object.getReference1())")]
}

pub struct CircularReference1 {
    pub name: String,
    pub reference2: RwLock<Option<Arc<CircularReference2>>>,
}

pub struct CircularReference2 {
    pub name: String,
    pub reference1: RwLock<Option<Arc<CircularReference1>>>,
}

impl Resource for CircularReference1 {
    fn class(&self) -> &'static ClassInfo {
        &CIRCULAR_REFERENCE_1
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", self.name.as_str()),
            Property::new("reference2", self.reference2.read().clone()).excluded(),
        ]
    }
}

impl Resource for CircularReference2 {
    fn class(&self) -> &'static ClassInfo {
        &CIRCULAR_REFERENCE_2
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("name", self.name.as_str()),
            Property::new("reference1", self.reference1.read().clone()).excluded(),
        ]
    }
}

pub fn circular_reference_1() -> Arc<CircularReference1> {
    Arc::new(CircularReference1 {
        name: "reference1".to_string(),
        reference2: RwLock::new(None),
    })
}

/// `reference1` and `reference2` pointing at each other.
pub fn circular_references() -> (Arc<CircularReference1>, Arc<CircularReference2>) {
    let reference1 = circular_reference_1();
    let reference2 = Arc::new(CircularReference2 {
        name: "reference2".to_string(),
        reference1: RwLock::new(Some(reference1.clone())),
    });
    *reference1.reference2.write() = Some(reference2.clone());
    (reference1, reference2)
}

/// Breaks the reference cycle so the test does not leak.
pub fn release(reference1: &Arc<CircularReference1>) {
    reference1.reference2.write().take();
}

// Relations from metadata files only.

pub static NO_ANNOTATIONS: ClassInfo = ClassInfo::new("fixtures::NoAnnotations");

pub struct NoAnnotations {
    pub id: i64,
    pub number: i64,
}

impl Resource for NoAnnotations {
    fn class(&self) -> &'static ClassInfo {
        &NO_ANNOTATIONS
    }

    fn properties(&self) -> Vec<Property> {
        vec![Property::new("id", self.id), Property::new("number", self.number)]
    }
}

// A route served by a named URL generator.

pub static WITH_ALTERNATIVE_ROUTER: ClassInfo = ClassInfo::new("fixtures::WithAlternativeRouter").with_annotations(&[
    r#"@Hateoas\Relation("search", href = @Hateoas\Route("/search", parameters = {"query" = "hello"}, generator = "my_generator"))"#,
]);

pub struct WithAlternativeRouter;

impl Resource for WithAlternativeRouter {
    fn class(&self) -> &'static ClassInfo {
        &WITH_ALTERNATIVE_ROUTER
    }

    fn properties(&self) -> Vec<Property> {
        Vec::new()
    }
}

// Depth-limited property and embed of the same shape.

pub static GH236_FOO: ClassInfo = ClassInfo::new("fixtures::Gh236Foo").with_annotations(&[
    r#"@Hateoas\Relation("b_embed", embedded = @Hateoas\Embedded("expr(object.b)", exclusion = @Hateoas\Exclusion(maxDepth = 1)))"#,
]);
pub static GH236_BAR: ClassInfo = ClassInfo::new("fixtures::Gh236Bar");

pub struct Gh236Foo {
    pub a: Arc<Gh236Bar>,
    pub b: Arc<Gh236Bar>,
}

pub struct Gh236Bar {
    pub xxx: String,
    pub inner: Option<Arc<Gh236Bar>>,
}

impl Gh236Bar {
    pub fn new(xxx: &str, inner: Option<Arc<Gh236Bar>>) -> Arc<Self> {
        Arc::new(Self {
            xxx: xxx.to_string(),
            inner,
        })
    }
}

impl Resource for Gh236Foo {
    fn class(&self) -> &'static ClassInfo {
        &GH236_FOO
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("a", self.a.clone()).max_depth(1),
            Property::new("b", self.b.clone()).excluded(),
        ]
    }
}

impl Resource for Gh236Bar {
    fn class(&self) -> &'static ClassInfo {
        &GH236_BAR
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("xxx", self.xxx.as_str()),
            Property::new("inner", self.inner.clone()),
        ]
    }
}

pub fn gh236_foo() -> Gh236Foo {
    Gh236Foo {
        a: Gh236Bar::new("yyy", Some(Gh236Bar::new("aaa", None))),
        b: Gh236Bar::new("zzz", Some(Gh236Bar::new("bbb", None))),
    }
}
