#![allow(dead_code)]

use bookshelf_app::books::BookNotId;

pub fn sample_input() -> BookNotId {
    BookNotId {
        title: "A".to_string(),
        author: "B".to_string(),
        categories: vec!["x".to_string()],
        link: "http://l".to_string(),
        year: 2000,
        image_url: "http://i".to_string(),
    }
}

pub fn revised_input() -> BookNotId {
    BookNotId {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        categories: vec!["sci-fi".to_string(), "classic".to_string()],
        link: "https://example.org/dune".to_string(),
        year: 1965,
        image_url: "https://example.org/dune.jpg".to_string(),
    }
}
