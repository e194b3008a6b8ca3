//! Sample book corpus
//!
//! Ten books spanning six genres and five decades, used by the CLI `seed`
//! command and the test suite.

use serde_json::Value;

use crate::document::Document;

#[allow(clippy::too_many_arguments)]
fn book(
    title: &str,
    author: &str,
    genre: &str,
    published_year: i64,
    price: f64,
    in_stock: bool,
    pages: i64,
    publisher: &str,
) -> Document {
    let mut doc = Document::new();
    doc.insert("title".to_string(), Value::from(title));
    doc.insert("author".to_string(), Value::from(author));
    doc.insert("genre".to_string(), Value::from(genre));
    doc.insert("published_year".to_string(), Value::from(published_year));
    doc.insert("price".to_string(), Value::from(price));
    doc.insert("in_stock".to_string(), Value::from(in_stock));
    doc.insert("pages".to_string(), Value::from(pages));
    doc.insert("publisher".to_string(), Value::from(publisher));
    doc
}

/// Returns the ten-book sample corpus, in seed order.
pub fn seed_documents() -> Vec<Document> {
    vec![
        book(
            "Dune",
            "Frank Herbert",
            "Science Fiction",
            1965,
            15.99,
            true,
            412,
            "Chilton Books",
        ),
        book(
            "The Name of the Wind",
            "Patrick Rothfuss",
            "Fantasy",
            2007,
            13.50,
            true,
            662,
            "DAW Books",
        ),
        book(
            "The Bell Jar",
            "Sylvia Plath",
            "Fiction",
            1963,
            10.99,
            false,
            294,
            "Heinemann",
        ),
        book(
            "Neuromancer",
            "William Gibson",
            "Science Fiction",
            1984,
            12.75,
            true,
            271,
            "Ace Books",
        ),
        book(
            "The Handmaid's Tale",
            "Margaret Atwood",
            "Dystopian",
            1985,
            11.99,
            true,
            311,
            "McClelland & Stewart",
        ),
        book(
            "Good Omens",
            "Neil Gaiman, Terry Pratchett",
            "Fantasy",
            1990,
            14.25,
            true,
            432,
            "Gollancz",
        ),
        book(
            "The Road",
            "Cormac McCarthy",
            "Post-Apocalyptic",
            2006,
            9.99,
            false,
            287,
            "Knopf",
        ),
        book(
            "Sapiens: A Brief History of Humankind",
            "Yuval Noah Harari",
            "Non-Fiction",
            2011,
            18.99,
            true,
            443,
            "Harvill Secker",
        ),
        book(
            "The Martian",
            "Andy Weir",
            "Science Fiction",
            2014,
            12.99,
            true,
            369,
            "Crown Publishing",
        ),
        book(
            "Circe",
            "Madeline Miller",
            "Fantasy",
            2018,
            16.50,
            true,
            393,
            "Little, Brown and Company",
        ),
    ]
}
