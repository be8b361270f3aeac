use super::Article;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub link: String,
}

impl Notification {
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            link: article.link.clone(),
        }
    }

    /// Format: "{title}\n{link}"
    pub fn format(&self) -> String {
        format!("{}\n{}", self.title, self.link)
    }
}
