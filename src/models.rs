use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    Available,
    Unavailable,
    Upcoming,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Unavailable => "unavailable",
            BookStatus::Upcoming => "upcoming",
        }
    }

    /// Accepts the canonical labels plus the shelf labels older catalogs were saved with.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "available" | "còn" => Some(BookStatus::Available),
            "unavailable" | "hết" => Some(BookStatus::Unavailable),
            "upcoming" | "sắp có" => Some(BookStatus::Upcoming),
            _ => None,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookStatus::from_label(s).ok_or_else(|| format!("unknown book status: {}", s))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: i32, // negative = BCE
    pub status: BookStatus,
    #[serde(default)]
    pub image: String, // data: URL or asset path, empty when missing
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Book {
    pub fn has_image(&self) -> bool {
        !self.image.trim().is_empty()
    }
}

/// Everything a book carries except its id; what the add and edit forms submit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
    pub year: i32,
    pub status: BookStatus,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
}

impl BookDraft {
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            category: self.category,
            year: self.year,
            status: self.status,
            image: self.image,
            quantity: self.quantity,
            content: self.content,
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        BookDraft {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            year: book.year,
            status: book.status,
            image: book.image.clone(),
            quantity: book.quantity,
            content: book.content.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_accepts_legacy_labels() {
        assert_eq!(BookStatus::from_label("Còn"), Some(BookStatus::Available));
        assert_eq!(BookStatus::from_label("Hết"), Some(BookStatus::Unavailable));
        assert_eq!(BookStatus::from_label("Sắp có"), Some(BookStatus::Upcoming));
        assert_eq!(BookStatus::from_label(" UPCOMING "), Some(BookStatus::Upcoming));
        assert!("lost".parse::<BookStatus>().is_err());
    }

    #[test]
    fn book_json_uses_lowercase_status_and_optional_fields() {
        let json = r#"{"id":1,"title":"T","author":"A","category":"C","year":-500,"status":"upcoming"}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.status, BookStatus::Upcoming);
        assert_eq!(book.year, -500);
        assert!(book.image.is_empty());
        assert!(book.quantity.is_none());
        assert!(!book.has_image());
    }
}
