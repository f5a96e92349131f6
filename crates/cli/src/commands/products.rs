//! Catalog browsing and review commands.
//!
//! # Usage
//!
//! ```bash
//! sf-cli home
//! sf-cli products --category Electronics --min 1000 --max 20000
//! sf-cli product 1
//! sf-cli review 1 4 "Great sound, tight fit"
//! ```

use rust_decimal::Decimal;

use shopfront_core::{Price, ProductId};
use shopfront_storefront::catalog::ProductQuery;
use shopfront_storefront::{AppError, Result, Storefront};

use super::{product_line, stars};

/// Products shown on the home page.
const FEATURED_COUNT: usize = 4;

/// Filters accepted by `sf-cli products`.
#[derive(Debug, Default)]
pub struct Filter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub in_stock: bool,
}

impl Filter {
    fn to_query(&self) -> Result<ProductQuery> {
        let mut query = ProductQuery::new();
        if let Some(term) = &self.search {
            query = query.term(term);
        }
        if let Some(category) = &self.category {
            query = query.category(category);
        }
        if let Some(min) = self.min {
            query = query.min_price(price_bound("--min", min)?);
        }
        if let Some(max) = self.max {
            query = query.max_price(price_bound("--max", max)?);
        }
        if self.in_stock {
            query = query.in_stock_only();
        }
        Ok(query)
    }
}

fn price_bound(flag: &str, amount: Decimal) -> Result<Price> {
    Price::new(amount).map_err(|e| AppError::BadRequest(format!("{flag}: {e}")))
}

/// Print the featured products and the category list.
#[allow(clippy::print_stdout)]
pub fn home(shop: &Storefront) {
    let catalog = shop.catalog();
    println!("Featured products");
    for product in catalog.featured(FEATURED_COUNT) {
        println!("{}", product_line(product));
    }
    println!();
    println!("Shop by category: {}", catalog.categories().join(", "));
}

/// List products matching `filter`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a negative price bound.
#[allow(clippy::print_stdout)]
pub fn list(shop: &Storefront, filter: &Filter) -> Result<()> {
    let query = filter.to_query()?;
    let products = shop.catalog().search(&query);

    if products.is_empty() {
        println!("No products match.");
        return Ok(());
    }
    for product in &products {
        println!("{}", product_line(product));
    }
    println!();
    println!(
        "{} of {} products. Categories: {}",
        products.len(),
        shop.catalog().len(),
        shop.catalog().categories().join(", ")
    );
    Ok(())
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns an error if the product does not exist.
#[allow(clippy::print_stdout)]
pub fn show(shop: &Storefront, id: &ProductId) -> Result<()> {
    let product = shop.product(id)?;

    println!("{} ({})", product.name, product.category);
    println!("  Price:    {}", product.price.display());
    println!(
        "  Rating:   {} {} / 5",
        stars(product.rating.full_stars()),
        product.rating
    );
    println!(
        "  Stock:    {}",
        if product.in_stock { "In stock" } else { "Out of stock" }
    );
    println!("  Image:    {}", product.image);
    println!();
    println!("{}", product.description);

    let saved = shop.wishlist().is_in_wishlist(id);
    let in_cart = shop.cart().get(id).map_or(0, |entry| entry.quantity);
    println!();
    println!(
        "In cart: {in_cart}  Wishlist: {}",
        if saved { "saved" } else { "not saved" }
    );

    let reviews = shop.reviews().reviews(id);
    if !reviews.is_empty() {
        println!();
        println!(
            "Reviews ({}, average {:.1}):",
            reviews.len(),
            shop.reviews().average_rating(id)
        );
        for review in reviews {
            println!("  {} {}: {}", stars(review.rating), review.username, review.comment);
        }
    }
    Ok(())
}

/// Post a review as the signed-in user, then show the product.
///
/// # Errors
///
/// Returns an error if the product does not exist, nobody is signed in, or
/// the review is invalid.
pub fn review(shop: &mut Storefront, id: &ProductId, rating: u8, comment: &str) -> Result<()> {
    shop.add_review(id, rating, comment)?;
    show(shop, id)
}
