//! Bundled catalog used when the hosted database has no products yet.

use crate::catalog::{Product, Review};
use crate::ids::ReviewId;
use crate::money::Money;
use chrono::NaiveDate;

fn review(id: &str, author: &str, rating: u8, comment: &str, ymd: (i32, u32, u32), verified: bool, helpful: u32) -> Review {
    Review {
        id: ReviewId::new(id),
        author: author.to_string(),
        rating,
        comment: comment.to_string(),
        date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap_or_default(),
        verified,
        helpful,
    }
}

/// The seed catalog, in id order.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new("1", "Classic White Tee", Money::usd(1999), "T-Shirts")
            .with_description("Soft organic cotton crew neck for everyday wear.")
            .with_sizes(["XS", "S", "M", "L", "XL"])
            .with_images(["/images/products/classic-white-tee.jpg"])
            .with_reviews(vec![
                review("r1", "Maya P.", 5, "Perfect fit and washes well.", (2024, 2, 11), true, 12),
                review("r2", "Jon K.", 4, "Runs slightly large.", (2024, 3, 2), true, 4),
            ]),
        Product::new("2", "Slim Fit Jeans", Money::usd(4999), "Jeans")
            .with_original_price(Money::usd(6999))
            .with_description("Stretch denim with a tapered leg and dark indigo wash.")
            .with_sizes(["28", "30", "32", "34", "36"])
            .with_images(["/images/products/slim-fit-jeans.jpg"])
            .with_reviews(vec![review("r3", "Leo S.", 4, "Comfortable all day.", (2024, 1, 20), true, 7)]),
        Product::new("3", "Summer Floral Dress", Money::usd(5999), "Dresses")
            .mark_new()
            .with_description("Lightweight viscose midi dress with a floral print.")
            .with_sizes(["XS", "S", "M", "L"])
            .with_images([
                "/images/products/summer-floral-dress.jpg",
                "/images/products/summer-floral-dress-back.jpg",
            ])
            .with_reviews(vec![
                review("r4", "Priya R.", 5, "Gorgeous colours.", (2024, 5, 8), true, 21),
                review("r5", "Ella M.", 5, "Got so many compliments.", (2024, 5, 19), false, 3),
                review("r6", "Nina T.", 4, "Lovely but wrinkles easily.", (2024, 6, 1), true, 2),
            ]),
        Product::new("4", "Wool Blend Overcoat", Money::usd(21999), "Outerwear")
            .with_description("Double-breasted overcoat in a warm wool blend.")
            .with_sizes(["S", "M", "L", "XL"])
            .with_images(["/images/products/wool-overcoat.jpg"])
            .with_reviews(vec![review("r7", "Omar H.", 5, "Warm and sharp.", (2023, 12, 3), true, 15)]),
        Product::new("5", "Leather Chelsea Boots", Money::usd(12999), "Shoes")
            .with_original_price(Money::usd(15999))
            .with_description("Full-grain leather boots with elastic side panels.")
            .with_sizes(["7", "8", "9", "10", "11"])
            .with_images(["/images/products/chelsea-boots.jpg"])
            .with_reviews(vec![
                review("r8", "Grace L.", 4, "Needed a week to break in.", (2024, 2, 27), true, 9),
                review("r9", "Tom B.", 3, "Sole is a bit thin.", (2024, 4, 14), false, 1),
            ]),
        Product::new("6", "Cashmere Crew Sweater", Money::usd(8999), "Knitwear")
            .mark_new()
            .with_description("Pure cashmere knit with ribbed cuffs and hem.")
            .with_sizes(["S", "M", "L"])
            .with_images(["/images/products/cashmere-sweater.jpg"]),
        Product::new("7", "Linen Button-Down Shirt", Money::usd(3999), "Shirts")
            .with_description("Breathable linen shirt for warm days.")
            .with_sizes(["S", "M", "L", "XL"])
            .with_images(["/images/products/linen-shirt.jpg"])
            .with_reviews(vec![review("r10", "Ravi N.", 4, "Great summer staple.", (2024, 6, 22), true, 5)]),
        Product::new("8", "Athletic Joggers", Money::usd(3499), "Activewear")
            .with_original_price(Money::usd(4499))
            .with_description("Tapered joggers in moisture-wicking fleece.")
            .with_sizes(["S", "M", "L", "XL"])
            .with_images(["/images/products/athletic-joggers.jpg"])
            .out_of_stock(),
        Product::new("9", "Silk Evening Gown", Money::usd(24999), "Dresses")
            .with_description("Floor-length silk gown with a cowl neckline.")
            .with_sizes(["XS", "S", "M"])
            .with_images(["/images/products/silk-gown.jpg"])
            .with_reviews(vec![review("r11", "Isabel F.", 5, "Breathtaking.", (2024, 3, 30), true, 18)]),
        Product::new("10", "Canvas Tote Bag", Money::usd(2499), "Accessories")
            .with_description("Heavyweight canvas tote with an inner pocket.")
            .with_images(["/images/products/canvas-tote.jpg"]),
        Product::new("11", "Summer Linen Shorts", Money::usd(2999), "Shorts")
            .mark_new()
            .with_description("Relaxed linen shorts with an elastic waist.")
            .with_sizes(["S", "M", "L"])
            .with_images(["/images/products/linen-shorts.jpg"]),
        Product::new("12", "Denim Trucker Jacket", Money::usd(7999), "Outerwear")
            .with_description("Classic trucker jacket in rigid denim.")
            .with_sizes(["S", "M", "L", "XL"])
            .with_images(["/images/products/denim-jacket.jpg"])
            .with_reviews(vec![review("r12", "Chris D.", 4, "Softens up nicely.", (2024, 4, 2), true, 6)]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_unique() {
        let products = seed_products();
        let ids: HashSet<_> = products.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), products.len());
    }

    #[test]
    fn test_seed_ratings_cached() {
        for product in seed_products() {
            assert_eq!(product.review_count as usize, product.reviews.len());
            assert!(product.reviews.iter().all(|r| (1..=5).contains(&r.rating)));
        }
    }
}
