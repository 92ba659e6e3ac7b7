use crate::models::product::Product;

/// The category choice that matches every product.
pub const ALL_CATEGORIES: &str = "All Categories";

/// Categories offered by the product list and the dashboard form.
pub const CATEGORIES: [&str; 7] = [
    ALL_CATEGORIES,
    "Analytics",
    "Automation",
    "CRM",
    "AI Tools",
    "Storage",
    "Management",
];

/// Word limit for descriptions on list cards.
pub const CARD_DESCRIPTION_WORDS: usize = 20;

/// Keeps the products matching both the search text and the category.
///
/// An empty search matches everything; otherwise the text must appear,
/// ignoring case, in the name or description. The category must be
/// `ALL_CATEGORIES` or equal the product's category exactly.
pub fn filter_products(products: &[Product], search: &str, category: &str) -> Vec<Product> {
    let needle = search.to_lowercase();
    products
        .iter()
        .filter(|product| {
            let matches_search = needle.is_empty()
                || product.product_name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
            let matches_category =
                category == ALL_CATEGORIES || product.category.as_deref() == Some(category);
            matches_search && matches_category
        })
        .cloned()
        .collect()
}

/// Shortens `text` to its first `max_words` space-separated words,
/// marking the cut with `...`.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split(' ').collect();
    if words.len() > max_words {
        format!("{}...", words[..max_words].join(" "))
    } else {
        text.to_string()
    }
}
