use hateoas_support::{ClassInfo, Exclusion, Property, Relation, Resource, Route, Value};

use super::CollectionRepresentation;
use super::collection::COLLECTION;

static PAGINATED: ClassInfo = ClassInfo::new("hateoas::representation::PaginatedRepresentation")
    .extends(&COLLECTION)
    .with_attributes(paginated_relations);

fn page_relation(rel: &str, parameters: &str) -> Relation {
    Relation::new(rel).with_href(
        Route::new("expr(object.getRoute())")
            .with_parameters_expression(parameters)
            .with_absolute("expr(object.isAbsolute())"),
    )
}

fn paginated_relations() -> Vec<Relation> {
    vec![
        page_relation("self", "expr(object.getParameters())"),
        page_relation("first", "expr(object.getParameters(1))"),
        page_relation("last", "expr(object.getParameters(object.getPages()))")
            .with_exclusion(Exclusion::new().exclude_if("expr(object.getPages() === null)")),
        page_relation("next", "expr(object.getParameters(object.getPage() + 1))").with_exclusion(
            Exclusion::new()
                .exclude_if("expr(object.getPages() !== null && (object.getPage() + 1) > object.getPages())"),
        ),
        page_relation("previous", "expr(object.getParameters(object.getPage() - 1))")
            .with_exclusion(Exclusion::new().exclude_if("expr((object.getPage() - 1) < 1)")),
    ]
}

/// A page of a collection with `self`, `first`, `last`, `next` and
/// `previous` links.
///
/// Page links are generated from `route` and the route parameters, with the
/// page and limit parameters set for each page. `last` needs the page count;
/// `next` is left out on the last known page and `previous` on the first.
#[derive(Debug, Clone)]
pub struct PaginatedRepresentation {
    inline: CollectionRepresentation,
    route: String,
    parameters: Vec<(String, Value)>,
    page: i64,
    limit: i64,
    pages: Option<i64>,
    total: Option<i64>,
    page_parameter_name: String,
    limit_parameter_name: String,
    absolute: bool,
}

impl PaginatedRepresentation {
    pub fn new(inline: CollectionRepresentation, route: impl Into<String>, page: i64, limit: i64) -> Self {
        Self {
            inline,
            route: route.into(),
            parameters: Vec::new(),
            page,
            limit,
            pages: None,
            total: None,
            page_parameter_name: "page".to_string(),
            limit_parameter_name: "limit".to_string(),
            absolute: false,
        }
    }

    /// Route parameters kept on every page link.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn with_pages(mut self, pages: i64) -> Self {
        self.pages = Some(pages);
        self
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_page_parameter_name(mut self, name: impl Into<String>) -> Self {
        self.page_parameter_name = name.into();
        self
    }

    pub fn with_limit_parameter_name(mut self, name: impl Into<String>) -> Self {
        self.limit_parameter_name = name.into();
        self
    }

    pub fn absolute(mut self, absolute: bool) -> Self {
        self.absolute = absolute;
        self
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn pages(&self) -> Option<i64> {
        self.pages
    }

    /// Route parameters of `page` (the current page when `None`) with
    /// `limit` (the current limit when `None`).
    pub fn parameters(&self, page: Option<i64>, limit: Option<i64>) -> Vec<(String, Value)> {
        let mut parameters = self.parameters.clone();
        set(&mut parameters, &self.page_parameter_name, page.unwrap_or(self.page));
        set(&mut parameters, &self.limit_parameter_name, limit.unwrap_or(self.limit));
        parameters
    }
}

fn set(parameters: &mut Vec<(String, Value)>, name: &str, value: i64) {
    match parameters.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = Value::from(value),
        None => parameters.push((name.to_string(), Value::from(value))),
    }
}

impl Resource for PaginatedRepresentation {
    fn class(&self) -> &'static ClassInfo {
        &PAGINATED
    }

    fn properties(&self) -> Vec<Property> {
        let mut properties = vec![
            Property::new("page", self.page),
            Property::new("limit", self.limit),
            Property::new("pages", self.pages),
            Property::new("total", self.total),
            Property::new("route", self.route.as_str()).excluded(),
            Property::new("absolute", self.absolute).excluded(),
        ];
        properties.extend(self.inline.properties());
        properties
    }

    fn call(&self, method: &str, args: &[Value]) -> Option<Value> {
        match method {
            "getParameters" => {
                let page = args.first().and_then(Value::as_i64);
                let limit = args.get(1).and_then(Value::as_i64);
                Some(Value::Map(self.parameters(page, limit)))
            }
            _ => None,
        }
    }
}
