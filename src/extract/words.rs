// src/extract/words.rs
// =============================================================================
// Word extraction: counts dictionary words in the visible text of a page.
//
// How it works:
// 1. Collect text nodes that are not inside <head>, <script>, <style>,
//    <noscript> or <template>
// 2. Split on whitespace and trim surrounding punctuation ("world," -> "world")
// 3. Keep tokens made only of letters that the dictionary knows
// 4. Count each kept token under its lowercase, UPPERCASE and Capitalized
//    forms. A form shared by two variants ("A" for the word "a") is counted
//    once per token.
//
// The result is one Item::Words per page, even when no word matched.
// =============================================================================

use scraper::{Html, Node};
use std::sync::Arc;

use super::{Dictionary, Extractor, Item, WordMap};

const HIDDEN_TAGS: [&str; 5] = ["head", "script", "style", "noscript", "template"];

#[derive(Debug, Clone)]
pub struct WordExtractor {
    dictionary: Arc<Dictionary>,
}

impl WordExtractor {
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        Self { dictionary }
    }

    fn count(&self, text: &str) -> WordMap {
        let mut counts = WordMap::new();

        for token in text.split_whitespace() {
            let token = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if token.is_empty() || !token.chars().all(char::is_alphabetic) {
                continue;
            }
            if !self.dictionary.contains(token) {
                continue;
            }

            let mut variants = case_variants(token);
            variants.dedup();
            for variant in variants {
                *counts.entry(variant).or_insert(0) += 1;
            }
        }

        counts
    }
}

impl Extractor for WordExtractor {
    fn extract(&self, _origin: &str, body: &str) -> Vec<Item> {
        vec![Item::Words(self.count(&visible_text(body)))]
    }
}

// Joins every visible text node, separated by spaces
fn visible_text(body: &str) -> String {
    let document = Html::parse_document(body);
    let mut text = String::new();

    for node in document.tree.nodes() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_TAGS.contains(&element.name()))
                .unwrap_or(false)
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }

    text
}

// [lowercase, CAPITALIZED form, UPPERCASE], sorted so equal forms are adjacent
fn case_variants(word: &str) -> Vec<String> {
    let lower = word.to_lowercase();
    let upper = word.to_uppercase();

    let mut chars = lower.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    let mut variants = vec![lower, capitalized, upper];
    variants.sort();
    variants
}
