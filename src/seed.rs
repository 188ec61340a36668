//! Sample dataset generator.
//!
//! Product rows are fully determined by the word lists below; only the
//! number of comments per product is random.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::model::{NewComment, Product};

const FIRST: [&str; 5] = ["Special edition", "New", "Cheap", "Quality", "Used"];
const SECOND: [&str; 4] = [
    "Three-headed Monkey",
    "Rubber Chicken",
    "Pint of Grog",
    "Monocle",
];
const DESCRIPTION: [&str; 6] = [
    "is finally here",
    "is recommended by Stan S. Stanman",
    "is the best sold product on Mêlée Island",
    "is \u{1F4AF}",
    "is \u{2764}\u{FE0F}",
    "is fine",
];
const COMMENTS: [&str; 6] = [
    "Comment 1",
    "Comment 2",
    "Comment 3",
    "Comment 4",
    "Comment 5",
    "Comment 6",
];

/// Upper bound on comments generated per product (inclusive).
pub const MAX_COMMENTS_PER_PRODUCT: usize = 5;

/// Number of products every seed contains.
pub const PRODUCT_COUNT: usize = FIRST.len() * SECOND.len();

/// Generated dataset, ready to be inserted in one transaction.
#[derive(Debug, Clone)]
pub struct Seed {
    pub products: Vec<Product>,
    pub comments: Vec<NewComment>,
}

impl Seed {
    /// Generate a seed from the thread RNG, dated relative to now.
    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng(), Utc::now())
    }

    /// Generate a seed from the given RNG, dating comments relative to `now`.
    pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Self {
        let products = generate_products();

        let mut comments = Vec::new();
        for product in &products {
            let count = rng.gen_range(1..=MAX_COMMENTS_PER_PRODUCT);
            comments.extend((0..count).map(|k| NewComment {
                product_id: product.id,
                text: format!("{} for {}", COMMENTS[k], product.name),
                posted_at: posted_at(now, count, k),
            }));
        }

        Self { products, comments }
    }
}

fn generate_products() -> Vec<Product> {
    let mut products = Vec::with_capacity(PRODUCT_COUNT);
    for (i, first) in FIRST.iter().enumerate() {
        for (j, second) in SECOND.iter().enumerate() {
            let position = SECOND.len() * i + j;
            let id = i64::try_from(position + 1).unwrap_or(i64::MAX);
            let name = format!("{first} {second}");
            let description = format!("{name} {}", DESCRIPTION[position % DESCRIPTION.len()]);
            products.push(Product {
                id,
                name,
                description,
                price: id,
            });
        }
    }
    products
}

/// Comment `k` of `count` is back-dated `count - k` days, then moved forward
/// `k` hours, so later comments are always newer.
fn posted_at(now: DateTime<Utc>, count: usize, k: usize) -> DateTime<Utc> {
    let days = i64::try_from(count - k).unwrap_or(0);
    let hours = i64::try_from(k).unwrap_or(0);
    now - Duration::days(days) + Duration::hours(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn seeded(seed: u64) -> Seed {
        Seed::generate(&mut StdRng::seed_from_u64(seed), Utc::now())
    }

    #[test]
    fn test_product_count_is_cross_product() {
        let seed = seeded(1);
        assert_eq!(seed.products.len(), 20);
        assert_eq!(seed.products.len(), PRODUCT_COUNT);
    }

    #[test]
    fn test_product_ids_unique_and_contiguous() {
        let seed = seeded(2);
        let ids: Vec<i64> = seed.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_products_are_deterministic() {
        let a = seeded(3);
        let b = seeded(99);
        assert_eq!(a.products, b.products);

        let first = &a.products[0];
        assert_eq!(first.name, "Special edition Three-headed Monkey");
        assert_eq!(first.description, "Special edition Three-headed Monkey is finally here");
        assert_eq!(first.price, 1);

        let last = a.products.last().unwrap();
        assert_eq!(last.name, "Used Monocle");
        assert_eq!(last.price, 20);
    }

    #[test]
    fn test_comments_reference_existing_products() {
        let seed = seeded(4);
        let ids: HashSet<i64> = seed.products.iter().map(|p| p.id).collect();
        for comment in &seed.comments {
            assert!(ids.contains(&comment.product_id));
        }
    }

    #[test]
    fn test_comment_count_per_product_in_range() {
        for s in 0..32 {
            let seed = seeded(s);
            let mut counts: HashMap<i64, usize> = HashMap::new();
            for comment in &seed.comments {
                *counts.entry(comment.product_id).or_default() += 1;
            }
            for product in &seed.products {
                let count = counts.get(&product.id).copied().unwrap_or(0);
                assert!((1..=MAX_COMMENTS_PER_PRODUCT).contains(&count), "count {count}");
            }
        }
    }

    #[test]
    fn test_comments_are_chronological_per_product() {
        let now = Utc::now();
        let seed = Seed::generate(&mut StdRng::seed_from_u64(5), now);
        for product in &seed.products {
            let comments: Vec<_> = seed
                .comments
                .iter()
                .filter(|c| c.product_id == product.id)
                .collect();
            for pair in comments.windows(2) {
                assert!(pair[0].posted_at < pair[1].posted_at);
            }
            for comment in &comments {
                assert!(comment.posted_at < now);
            }
        }
    }

    #[test]
    fn test_comment_text_names_product() {
        let seed = seeded(6);
        let product = &seed.products[0];
        let first = seed
            .comments
            .iter()
            .find(|c| c.product_id == product.id)
            .unwrap();
        assert_eq!(first.text, format!("Comment 1 for {}", product.name));
    }
}
