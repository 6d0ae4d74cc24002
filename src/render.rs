//! # Display model for the catalog
//!
//! Turns book records into the cards, detail panel, reading pane and header
//! statistics a front end shows. Rendering is a pure function of its input:
//! the same records and [`ViewMode`] always give the same [`Rendered`].
//!
//! Cards keep raw field values. Escaping happens in [`Rendered::to_html`] and
//! the other HTML writers, so a title like `<script>` is shown literally; the
//! text writers pass every stored field through [`sanitize_line`] or
//! [`sanitize_text`] instead.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::models::Book;

pub const PLACEHOLDER_GLYPH: &str = "📖";
pub const MISSING_VALUE: &str = "—";
pub const EMPTY_STATE_TITLE: &str = "No books found";
pub const EMPTY_STATE_HINT: &str = "Add a new book to start building your library";
pub const NO_CONTENT_HTML: &str = "<i>No reading content for this book yet.</i>";
pub const NO_CONTENT_TEXT: &str = "No reading content for this book yet.";
const REPLACEMENT: char = '\u{fffd}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
  #[default]
  Grid,
  List,
}

impl ViewMode {
  pub fn css_class(&self) -> &'static str {
    match self {
      ViewMode::Grid => "books-grid",
      ViewMode::List => "books-grid list-view",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
  Embedded(String),
  Placeholder,
}

impl CardImage {
  fn of(book: &Book) -> Self {
    if book.has_image() {
      CardImage::Embedded(book.image.clone())
    } else {
      CardImage::Placeholder
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub category: String,
  pub year: String,
  pub image: CardImage,
}

/// One full render pass: either cards or the empty state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
  pub mode: ViewMode,
  pub cards: Vec<Card>,
}

impl Rendered {
  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn to_html(&self) -> String {
    let mut html = String::new();
    let _ = write!(html, "<div class=\"{}\">", self.mode.css_class());
    if self.cards.is_empty() {
      let _ = write!(
        html,
        "<div class=\"empty-state\"><div class=\"empty-state-icon\">📚</div>\
         <div class=\"empty-state-text\">{}</div><p>{}</p></div>",
        EMPTY_STATE_TITLE, EMPTY_STATE_HINT
      );
    }
    for card in &self.cards {
      let title = escape_html(&card.title);
      let image = match &card.image {
        CardImage::Embedded(src) => format!(
          "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
          escape_html(src),
          title
        ),
        CardImage::Placeholder => PLACEHOLDER_GLYPH.to_string(),
      };
      let _ = write!(
        html,
        "<div class=\"book-card\" data-id=\"{id}\">\
         <div class=\"book-image\">{image}</div>\
         <div class=\"book-info\">\
         <div class=\"book-title\">{title}</div>\
         <div class=\"book-author\">✍️ {author}</div>\
         <div class=\"book-details\">\
         <span class=\"book-category\">{category}</span>\
         <span class=\"book-year\">📅 {year}</span>\
         </div></div></div>",
        id = card.id,
        image = image,
        title = title,
        author = escape_html(&card.author),
        category = escape_html(&card.category),
        year = escape_html(&card.year),
      );
    }
    html.push_str("</div>");
    html
  }

  pub fn to_text(&self) -> String {
    if self.cards.is_empty() {
      return format!("📚 {}\n{}\n", EMPTY_STATE_TITLE, EMPTY_STATE_HINT);
    }
    let mut out = String::new();
    for card in &self.cards {
      let glyph = match card.image {
        CardImage::Embedded(_) => "🖼",
        CardImage::Placeholder => PLACEHOLDER_GLYPH,
      };
      match self.mode {
        ViewMode::List => {
          let _ = writeln!(
            out,
            "{} {:<14} {} | {} | {} | {}",
            glyph,
            card.id,
            sanitize_line(&card.title),
            sanitize_line(&card.author),
            sanitize_line(&card.category),
            card.year
          );
        }
        ViewMode::Grid => {
          let _ = writeln!(out, "{} [{}] {}", glyph, card.id, sanitize_line(&card.title));
          let _ = writeln!(out, "   ✍️ {}", sanitize_line(&card.author));
          let _ = writeln!(out, "   {} · 📅 {}", sanitize_line(&card.category), card.year);
          out.push('\n');
        }
      }
    }
    out
  }
}

pub fn render_cards(books: &[&Book], mode: ViewMode) -> Rendered {
  Rendered {
    mode,
    cards: books
      .iter()
      .map(|book| Card {
        id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        category: book.category.clone(),
        year: format_year(book.year),
        image: CardImage::of(book),
      })
      .collect(),
  }
}

/// Negative years count back from year one: `-500` reads "500 BCE".
pub fn format_year(year: i32) -> String {
  if year < 0 {
    format!("{} BCE", year.unsigned_abs())
  } else {
    year.to_string()
  }
}

pub fn escape_html(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for ch in text.chars() {
    match ch {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      '\'' => escaped.push_str("&#39;"),
      _ => escaped.push(ch),
    }
  }
  escaped
}

/// Terminal-safe text: control characters other than `\n` become U+FFFD, so
/// stored text cannot emit escape sequences.
pub fn sanitize_text(text: &str) -> String {
  text
    .chars()
    .map(|ch| if ch.is_control() && ch != '\n' { REPLACEMENT } else { ch })
    .collect()
}

/// Like [`sanitize_text`], for single-line fields: line breaks become spaces.
pub fn sanitize_line(text: &str) -> String {
  sanitize_text(text).replace('\n', " ")
}

/// Read-only detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
  pub id: i64,
  pub title: String,
  pub author: String,
  pub category: String,
  pub year: String,
  pub quantity: String,
  pub status: String,
  pub image: CardImage,
}

impl Detail {
  pub fn of(book: &Book) -> Self {
    Detail {
      id: book.id,
      title: book.title.clone(),
      author: book.author.clone(),
      category: book.category.clone(),
      year: format_year(book.year),
      quantity: book
        .quantity
        .map(|value| value.to_string())
        .unwrap_or_else(|| MISSING_VALUE.to_string()),
      status: book.status.to_string(),
      image: CardImage::of(book),
    }
  }

  pub fn to_text(&self) -> String {
    let image = match &self.image {
      CardImage::Embedded(src) if src.starts_with("data:") => "embedded".to_string(),
      CardImage::Embedded(src) => sanitize_line(src),
      CardImage::Placeholder => PLACEHOLDER_GLYPH.to_string(),
    };
    format!(
      "{}\n  Author:   {}\n  Category: {}\n  Year:     {}\n  Quantity: {}\n  Status:   {}\n  Image:    {}\n",
      sanitize_line(&self.title),
      sanitize_line(&self.author),
      sanitize_line(&self.category),
      self.year,
      self.quantity,
      self.status,
      image
    )
  }

  pub fn to_html(&self) -> String {
    let image = match &self.image {
      CardImage::Embedded(src) => format!("<img id=\"detailImage\" src=\"{}\">", escape_html(src)),
      CardImage::Placeholder => PLACEHOLDER_GLYPH.to_string(),
    };
    format!(
      "<div class=\"book-detail\" data-id=\"{}\">{}\
       <h2 id=\"detailTitle\">{}</h2>\
       <p id=\"detailAuthor\">{}</p>\
       <p id=\"detailCategory\">{}</p>\
       <p id=\"detailYear\">{}</p>\
       <p id=\"detailQuantity\">{}</p>\
       <p id=\"detailStatus\">{}</p></div>",
      self.id,
      image,
      escape_html(&self.title),
      escape_html(&self.author),
      escape_html(&self.category),
      escape_html(&self.year),
      escape_html(&self.quantity),
      escape_html(&self.status),
    )
  }
}

/// Reading pane markup: escaped content with line breaks kept.
pub fn reading_html(book: &Book) -> String {
  match book.content.as_deref() {
    Some(content) if !content.trim().is_empty() => escape_html(content).replace('\n', "<br>"),
    _ => NO_CONTENT_HTML.to_string(),
  }
}

pub fn reading_text(book: &Book) -> String {
  match book.content.as_deref() {
    Some(content) if !content.trim().is_empty() => sanitize_text(content),
    _ => NO_CONTENT_TEXT.to_string(),
  }
}

/// Header counters shown above the shelf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
  pub total_books: usize,
  pub total_categories: usize,
  pub newest_year: Option<i32>,
}

impl Stats {
  pub fn of(books: &[Book]) -> Self {
    let categories: HashSet<&str> = books.iter().map(|book| book.category.as_str()).collect();
    Stats {
      total_books: books.len(),
      total_categories: categories.len(),
      newest_year: books.iter().map(|book| book.year).filter(|year| *year > 0).max(),
    }
  }

  pub fn newest_year_label(&self) -> String {
    self
      .newest_year
      .map(|year| year.to_string())
      .unwrap_or_else(|| "N/A".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::BookStatus;

  fn book(id: i64, title: &str, year: i32) -> Book {
    Book {
      id,
      title: title.to_string(),
      author: "Tôn Tử".to_string(),
      category: "Lịch sử".to_string(),
      year,
      status: BookStatus::Available,
      image: String::new(),
      quantity: None,
      content: None,
    }
  }

  #[test]
  fn years_before_the_epoch_get_a_bce_label() {
    assert_eq!(format_year(-500), "500 BCE");
    assert_eq!(format_year(2008), "2008");
    assert_eq!(format_year(0), "0");
    assert_eq!(format_year(i32::MIN), "2147483648 BCE");
  }

  #[test]
  fn empty_view_renders_the_empty_state() {
    let rendered = render_cards(&[], ViewMode::Grid);
    assert!(rendered.is_empty());
    let html = rendered.to_html();
    assert!(html.contains("empty-state"));
    assert!(html.contains(EMPTY_STATE_TITLE));
    assert!(rendered.to_text().contains(EMPTY_STATE_TITLE));
  }

  #[test]
  fn cards_escape_markup_and_use_placeholder() {
    let evil = book(1, "<script>alert('x')</script>", -500);
    let html = render_cards(&[&evil], ViewMode::List).to_html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    assert!(html.contains(PLACEHOLDER_GLYPH));
    assert!(html.contains("500 BCE"));
    assert!(html.contains("list-view"));
  }

  #[test]
  fn cards_embed_image_when_present() {
    let mut with_image = book(2, "Clean Code", 2008);
    with_image.image = "data:image/jpeg;base64,AAAA".to_string();
    let rendered = render_cards(&[&with_image], ViewMode::Grid);
    assert_eq!(
      rendered.cards[0].image,
      CardImage::Embedded("data:image/jpeg;base64,AAAA".to_string())
    );
    assert!(rendered.to_html().contains("<img src=\"data:image/jpeg;base64,AAAA\""));
  }

  #[test]
  fn render_is_deterministic() {
    let a = book(1, "A", 1);
    let b = book(2, "B", 2);
    assert_eq!(
      render_cards(&[&a, &b], ViewMode::Grid),
      render_cards(&[&a, &b], ViewMode::Grid)
    );
  }

  #[test]
  fn detail_falls_back_for_missing_quantity() {
    let mut record = book(3, "Binh Pháp Tôn Tử", -500);
    let detail = Detail::of(&record);
    assert_eq!(detail.quantity, MISSING_VALUE);
    assert_eq!(detail.year, "500 BCE");
    assert_eq!(detail.status, "available");

    record.quantity = Some(4);
    assert_eq!(Detail::of(&record).quantity, "4");
  }

  #[test]
  fn reading_pane_escapes_and_keeps_line_breaks() {
    let mut record = book(4, "Notes", 2020);
    assert_eq!(reading_html(&record), NO_CONTENT_HTML);

    record.content = Some("   ".to_string());
    assert_eq!(reading_html(&record), NO_CONTENT_HTML);

    record.content = Some("line <1>\nline 2".to_string());
    assert_eq!(reading_html(&record), "line &lt;1&gt;<br>line 2");
  }

  #[test]
  fn stats_ignore_non_positive_years() {
    let books = vec![book(1, "A", -500), book(2, "B", 1943)];
    let stats = Stats::of(&books);
    assert_eq!(stats.total_books, 2);
    assert_eq!(stats.total_categories, 1);
    assert_eq!(stats.newest_year_label(), "1943");

    let ancient = vec![book(1, "A", -500)];
    assert_eq!(Stats::of(&ancient).newest_year_label(), "N/A");
  }

  #[test]
  fn text_output_neutralises_control_characters() {
    let mut evil = book(5, "Evil\x1b[31mRED\x07", 1999);
    evil.author = "Line\none".to_string();

    let list = render_cards(&[&evil], ViewMode::List).to_text();
    assert!(!list.contains('\x1b'));
    assert!(!list.contains('\x07'));
    assert!(list.contains("Evil\u{fffd}[31mRED\u{fffd}"));
    assert!(list.contains("Line one"));
    assert_eq!(list.lines().count(), 1);

    let grid = render_cards(&[&evil], ViewMode::Grid).to_text();
    assert!(!grid.contains('\x1b'));

    let detail = Detail::of(&evil).to_text();
    assert!(!detail.contains('\x1b'));
    assert!(detail.starts_with("Evil\u{fffd}[31mRED"));
  }

  #[test]
  fn reading_text_keeps_line_breaks_without_markup() {
    let mut record = book(6, "Notes", 2020);
    assert_eq!(reading_text(&record), NO_CONTENT_TEXT);

    record.content = Some("a <b>\r\nline2".to_string());
    assert_eq!(reading_text(&record), "a <b>\u{fffd}\nline2");
  }
}
