use serde::Serialize;

/// Category tags of a feed item, as RSS allows zero, one or many `<category>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Category {
    Single(String),
    Many(Vec<String>),
}

impl Category {
    pub fn from_terms(mut terms: Vec<String>) -> Option<Self> {
        match terms.len() {
            0 => None,
            1 => terms.pop().map(Category::Single),
            _ => Some(Category::Many(terms)),
        }
    }

    /// JSON text stored in the `category` column
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub pub_date: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
}

impl Article {
    pub fn new(guid: impl Into<String>, title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            title: title.into(),
            link: link.into(),
            pub_date: None,
            category: None,
            description: None,
        }
    }

    pub fn with_pub_date(mut self, pub_date: Option<String>) -> Self {
        self.pub_date = pub_date;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}
