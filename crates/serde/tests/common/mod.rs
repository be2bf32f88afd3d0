#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::RwLock;

use hateoas_support::{ClassInfo, Property, Resource, Value};

pub static AUTHOR: ClassInfo = ClassInfo::new("blog::Author").with_xml_root_name("author");
pub static POST: ClassInfo = ClassInfo::new("blog::Post");
pub static TREE: ClassInfo = ClassInfo::new("blog::Tree");

pub struct Author {
    pub first_name: String,
    pub email: Option<String>,
    pub posts: RwLock<Vec<Arc<Post>>>,
}

pub struct Post {
    pub title: String,
    pub draft: bool,
    pub author: RwLock<Option<Arc<Author>>>,
}

impl Resource for Author {
    fn class(&self) -> &'static ClassInfo {
        &AUTHOR
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("firstName", self.first_name.as_str()).groups(["Default", "list"]),
            Property::new("email", self.email.clone()).since("2.0"),
            Property::new("posts", self.posts.read().clone()),
        ]
    }
}

impl Resource for Post {
    fn class(&self) -> &'static ClassInfo {
        &POST
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("title", self.title.as_str()).groups(["list"]),
            Property::new("draft", self.draft),
            Property::new("author", self.author.read().clone()),
        ]
    }
}

/// An author with one post pointing back to the author.
pub fn author_with_post() -> Arc<Author> {
    let author = Arc::new(Author {
        first_name: "Adrien".to_string(),
        email: None,
        posts: RwLock::new(Vec::new()),
    });
    let post = Arc::new(Post {
        title: "Cycles".to_string(),
        draft: false,
        author: RwLock::new(Some(author.clone())),
    });
    author.posts.write().push(post);
    author
}

/// Breaks the author/post cycle so the test does not leak.
pub fn release(author: &Arc<Author>) {
    author.posts.write().clear();
}

/// A chain of nested nodes, `depth` levels deep.
pub struct Tree {
    pub level: i64,
    pub child: Option<Arc<Tree>>,
    pub child_depth: Option<usize>,
}

impl Resource for Tree {
    fn class(&self) -> &'static ClassInfo {
        &TREE
    }

    fn properties(&self) -> Vec<Property> {
        let child = Property::new("child", self.child.clone());
        vec![
            Property::new("level", self.level),
            match self.child_depth {
                Some(depth) => child.max_depth(depth),
                None => child,
            },
        ]
    }
}

pub fn tree(levels: i64, child_depth: Option<usize>) -> Value {
    let mut node: Option<Arc<Tree>> = None;
    for level in (1..=levels).rev() {
        node = Some(Arc::new(Tree {
            level,
            child: node,
            child_depth,
        }));
    }
    Value::from(node)
}
