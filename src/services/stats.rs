//! Catalog statistics and inventory reports

use chrono::{DateTime, Datelike, Duration, Utc};
use crate::models::{Collection, Record};
use crate::utils::helpers::{format_price_clp, format_timestamp};
use super::catalog::CatalogService;

const UNCATEGORIZED: &str = "Sin categoría";
const RECENT_POSTS_DAYS: i64 = 30;
const TOP_PRODUCTS: usize = 5;
const ACTIVITY_MONTHS: u32 = 6;
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Upper bounds (exclusive) of the price buckets; the last bucket is open
const PRICE_BUCKETS: [(&str, Option<f64>); 5] = [
    ("Menos de $1.000", Some(1000.0)),
    ("$1.000 - $5.000", Some(5000.0)),
    ("$5.000 - $10.000", Some(10000.0)),
    ("$10.000 - $20.000", Some(20000.0)),
    ("Más de $20.000", None),
];

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneralStats {
    pub product_count: usize,
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub category_count: usize,
    pub distribution: Vec<CategoryShare>,
    pub post_count: usize,
    pub recent_posts: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBucket {
    pub label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReport {
    pub total_value: f64,
    pub average_value: f64,
    /// Most expensive products, as (name, price)
    pub top_products: Vec<(String, f64)>,
    pub buckets: Vec<PriceBucket>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductStats {
    pub product_count: usize,
    pub category_count: usize,
    pub average_price: f64,
    pub distribution: Vec<CategoryShare>,
}

/// Posts created in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthActivity {
    pub year: i32,
    /// 1-based
    pub month: u32,
    pub count: usize,
}

impl MonthActivity {
    pub fn label(&self) -> String {
        let index = (self.month.clamp(1, 12) - 1) as usize;
        format!("{} {}", MONTH_ABBREVIATIONS[index], self.year)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostStats {
    pub post_count: usize,
    pub last_post: DateTime<Utc>,
    /// Current month first
    pub activity: Vec<MonthActivity>,
}

fn price_of(product: &Record) -> f64 {
    product.get_f64("precio").unwrap_or(0.0)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Products per category, largest first. Ties keep name order.
pub fn category_distribution(products: &[Record]) -> Vec<CategoryShare> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for product in products {
        let name = product
            .get_str("categoria")
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(UNCATEGORIZED);
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, count)) => *count += 1,
            None => counts.push((name.to_string(), 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
        .into_iter()
        .map(|(name, count)| CategoryShare {
            percentage: percentage(count, products.len()),
            name,
            count,
        })
        .collect()
}

pub fn general_stats(
    products: &[Record],
    categories: &[Record],
    posts: &[Record],
    now: DateTime<Utc>,
) -> GeneralStats {
    let prices: Vec<f64> = products.iter().map(price_of).collect();
    let total: f64 = prices.iter().sum();
    let cutoff = now - Duration::days(RECENT_POSTS_DAYS);

    GeneralStats {
        product_count: products.len(),
        average_price: if prices.is_empty() { 0.0 } else { total / prices.len() as f64 },
        min_price: prices.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_price: prices.iter().copied().reduce(f64::max).unwrap_or(0.0),
        category_count: categories.len(),
        distribution: category_distribution(products),
        post_count: posts.len(),
        recent_posts: posts.iter().filter(|p| p.created_at > cutoff).count(),
    }
}

pub fn product_stats(products: &[Record], categories: &[Record]) -> ProductStats {
    let total: f64 = products.iter().map(price_of).sum();
    ProductStats {
        product_count: products.len(),
        category_count: categories.len(),
        average_price: if products.is_empty() { 0.0 } else { total / products.len() as f64 },
        distribution: category_distribution(products),
    }
}

/// The month `back` months before (year, month)
fn month_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// `None` when there are no posts
pub fn post_stats(posts: &[Record], now: DateTime<Utc>) -> Option<PostStats> {
    let last_post = posts.iter().map(|p| p.created_at).max()?;

    let activity = (0..ACTIVITY_MONTHS)
        .map(|back| {
            let (year, month) = month_before(now.year(), now.month(), back);
            let count = posts
                .iter()
                .filter(|p| p.created_at.year() == year && p.created_at.month() == month)
                .count();
            MonthActivity { year, month, count }
        })
        .collect();

    Some(PostStats {
        post_count: posts.len(),
        last_post,
        activity,
    })
}

/// `None` when there are no products
pub fn inventory_report(products: &[Record]) -> Option<InventoryReport> {
    if products.is_empty() {
        return None;
    }

    let total_value: f64 = products.iter().map(price_of).sum();

    let mut sorted: Vec<&Record> = products.iter().collect();
    sorted.sort_by(|a, b| price_of(b).total_cmp(&price_of(a)));
    let top_products = sorted
        .into_iter()
        .take(TOP_PRODUCTS)
        .map(|p| (p.label().to_string(), price_of(p)))
        .collect();

    let mut counts = [0usize; PRICE_BUCKETS.len()];
    for product in products {
        let price = price_of(product);
        let index = PRICE_BUCKETS
            .iter()
            .position(|(_, upper)| upper.map(|u| price < u).unwrap_or(true))
            .unwrap_or(PRICE_BUCKETS.len() - 1);
        counts[index] += 1;
    }

    let buckets = PRICE_BUCKETS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| PriceBucket {
            label: *label,
            count,
            percentage: percentage(count, products.len()),
        })
        .collect();

    Some(InventoryReport {
        total_value,
        average_value: total_value / products.len() as f64,
        top_products,
        buckets,
    })
}

pub fn render_general_stats(stats: &GeneralStats, now: DateTime<Utc>) -> String {
    let mut text = String::from("📊 ESTADÍSTICAS GENERALES\n\n");

    text.push_str("📦 PRODUCTOS:\n");
    text.push_str(&format!("• Total: {}\n", stats.product_count));
    text.push_str(&format!("• Precio promedio: {}\n", format_price_clp(stats.average_price)));
    text.push_str(&format!(
        "• Rango: {} - {}\n\n",
        format_price_clp(stats.min_price),
        format_price_clp(stats.max_price)
    ));

    text.push_str("📂 CATEGORÍAS:\n");
    text.push_str(&format!("• Total: {}\n", stats.category_count));
    if !stats.distribution.is_empty() {
        text.push_str("• Distribución:\n");
        for share in &stats.distribution {
            text.push_str(&format!("  {}: {} ({:.1}%)\n", share.name, share.count, share.percentage));
        }
    }
    text.push('\n');

    text.push_str("📰 PUBLICACIONES:\n");
    text.push_str(&format!("• Total: {}\n", stats.post_count));
    text.push_str(&format!("• Últimos {} días: {}\n\n", RECENT_POSTS_DAYS, stats.recent_posts));

    text.push_str(&format!("🕐 Actualizado: {}", format_timestamp(now)));
    text
}

pub fn render_inventory_report(report: &InventoryReport, now: DateTime<Utc>) -> String {
    let mut text = String::from("📈 REPORTE DETALLADO DE INVENTARIO\n\n");

    text.push_str("💰 VALOR DEL INVENTARIO:\n");
    text.push_str(&format!("• Valor total: {}\n", format_price_clp(report.total_value)));
    text.push_str(&format!("• Valor promedio por producto: {}\n\n", format_price_clp(report.average_value)));

    text.push_str("🏆 PRODUCTOS MÁS VALIOSOS:\n");
    for (i, (name, price)) in report.top_products.iter().enumerate() {
        text.push_str(&format!("{}. {} - {}\n", i + 1, name, format_price_clp(*price)));
    }
    text.push('\n');

    text.push_str("📊 DISTRIBUCIÓN DE PRECIOS:\n");
    for bucket in report.buckets.iter().filter(|b| b.count > 0) {
        let bars = "▰".repeat((bucket.percentage / 10.0).floor() as usize);
        text.push_str(&format!("{}: {} {} ({:.1}%)\n", bucket.label, bars, bucket.count, bucket.percentage));
    }

    text.push_str(&format!("\n📅 Fecha del reporte: {}", format_timestamp(now)));
    text
}

pub fn render_category_breakdown(distribution: &[CategoryShare]) -> String {
    if distribution.is_empty() {
        return "📭 No hay productos registrados.".to_string();
    }

    let mut text = String::from("📂 PRODUCTOS POR CATEGORÍA\n\n");
    for share in distribution {
        text.push_str(&format!("• {}: {} ({:.1}%)\n", share.name, share.count, share.percentage));
    }
    text
}

pub fn render_product_stats(stats: &ProductStats) -> String {
    let mut text = String::from("📊 ESTADÍSTICAS DE PRODUCTOS\n\n");
    text.push_str(&format!("📦 Total Productos: {}\n", stats.product_count));
    text.push_str(&format!("📂 Total Categorías: {}\n", stats.category_count));
    text.push_str(&format!("💰 Precio Promedio: {}\n\n", format_price_clp(stats.average_price)));

    text.push_str("Distribución por Categoría:\n");
    for share in &stats.distribution {
        text.push_str(&format!("• {}: {} ({:.1}%)\n", share.name, share.count, share.percentage));
    }
    text
}

pub fn render_post_stats(stats: Option<&PostStats>) -> String {
    let Some(stats) = stats else {
        return "📭 No hay publicaciones registradas.".to_string();
    };

    let mut text = String::from("📊 ESTADÍSTICAS DE PUBLICACIONES\n\n");
    text.push_str(&format!("📰 Total Publicaciones: {}\n", stats.post_count));
    text.push_str(&format!("📅 Última publicación: {}\n\n", format_timestamp(stats.last_post)));

    text.push_str(&format!("Actividad últimos {} meses:\n", ACTIVITY_MONTHS));
    for month in &stats.activity {
        let bars = "█".repeat((month.count / 2).min(10));
        text.push_str(&format!("• {}: {} {}\n", month.label(), bars, month.count));
    }
    text
}

/// Builds the statistics messages from the catalog
#[derive(Debug, Clone)]
pub struct StatsService {
    catalog: CatalogService,
}

impl StatsService {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }

    pub async fn general(&self) -> String {
        let (products, categories, posts) = futures::join!(
            self.catalog.list(Collection::Products),
            self.catalog.list(Collection::Categories),
            self.catalog.list(Collection::Posts),
        );
        let now = Utc::now();
        render_general_stats(&general_stats(&products, &categories, &posts, now), now)
    }

    pub async fn inventory(&self) -> String {
        let products = self.catalog.list(Collection::Products).await;
        match inventory_report(&products) {
            Some(report) => render_inventory_report(&report, Utc::now()),
            None => "📭 No hay datos para generar reporte.".to_string(),
        }
    }

    pub async fn category_breakdown(&self) -> String {
        let products = self.catalog.list(Collection::Products).await;
        render_category_breakdown(&category_distribution(&products))
    }

    pub async fn products(&self) -> String {
        let (products, categories) = futures::join!(
            self.catalog.list(Collection::Products),
            self.catalog.list(Collection::Categories),
        );
        render_product_stats(&product_stats(&products, &categories))
    }

    pub async fn posts(&self) -> String {
        let posts = self.catalog.list(Collection::Posts).await;
        render_post_stats(post_stats(&posts, Utc::now()).as_ref())
    }

    /// Statistics shown from a section menu
    pub async fn section(&self, collection: Collection) -> String {
        match collection {
            Collection::Products => self.products().await,
            Collection::Categories => self.category_breakdown().await,
            Collection::Posts => self.posts().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use crate::models::RecordFields;

    fn product(name: &str, price: f64, category: &str) -> Record {
        let mut fields = RecordFields::new();
        fields.insert("nombre".to_string(), json!(name));
        fields.insert("precio".to_string(), json!(price));
        fields.insert("categoria".to_string(), json!(category));
        Record {
            id: name.to_string(),
            collection: Collection::Products,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn post(age_days: i64) -> Record {
        post_at(Utc::now() - Duration::days(age_days))
    }

    fn post_at(created: DateTime<Utc>) -> Record {
        Record {
            id: format!("post-{}", created.timestamp()),
            collection: Collection::Posts,
            fields: RecordFields::new(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_general_stats() {
        let products = vec![
            product("Huevos", 1200.0, "Alimentos"),
            product("Cloro", 800.0, "Limpieza"),
            product("Pan", 1600.0, "Alimentos"),
        ];
        let posts = vec![post(1), post(45)];

        let stats = general_stats(&products, &[], &posts, Utc::now());

        assert_eq!(stats.product_count, 3);
        assert_eq!(stats.average_price, 1200.0);
        assert_eq!(stats.min_price, 800.0);
        assert_eq!(stats.max_price, 1600.0);
        assert_eq!(stats.distribution[0].name, "Alimentos");
        assert_eq!(stats.distribution[0].count, 2);
        assert_eq!(stats.recent_posts, 1);
    }

    #[test]
    fn test_empty_stats_do_not_divide_by_zero() {
        let stats = general_stats(&[], &[], &[], Utc::now());
        assert_eq!(stats.average_price, 0.0);
        assert!(stats.distribution.is_empty());
        assert!(render_general_stats(&stats, Utc::now()).contains("Total: 0"));
    }

    #[test]
    fn test_inventory_report_buckets_and_top() {
        let products: Vec<Record> = [500.0, 1000.0, 4999.0, 7000.0, 15000.0, 20000.0, 30000.0]
            .iter()
            .enumerate()
            .map(|(i, price)| product(&format!("p{}", i), *price, ""))
            .collect();

        let report = inventory_report(&products).unwrap();
        let counts: Vec<usize> = report.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 1, 1, 2]);
        assert_eq!(report.top_products.len(), 5);
        assert_eq!(report.top_products[0], ("p6".to_string(), 30000.0));
        assert!(inventory_report(&[]).is_none());
    }

    #[test]
    fn test_missing_category_is_grouped() {
        let distribution = category_distribution(&[product("x", 1.0, "  ")]);
        assert_eq!(distribution[0].name, UNCATEGORIZED);
        assert_eq!(distribution[0].percentage, 100.0);
    }

    #[test]
    fn test_product_stats() {
        let products = vec![
            product("Huevos", 1200.0, "Alimentos"),
            product("Cloro", 900.0, "Limpieza"),
            product("Pan", 1500.0, "Alimentos"),
        ];
        let categories = vec![product("Alimentos", 0.0, ""), product("Limpieza", 0.0, "")];

        let stats = product_stats(&products, &categories);
        assert_eq!(stats.category_count, 2);
        assert_eq!(stats.average_price, 1200.0);

        let text = render_product_stats(&stats);
        assert!(text.contains("Total Productos: 3"));
        assert!(text.contains("Precio Promedio: $1.200"));
        assert!(text.contains("• Alimentos: 2 (66.7%)"));
    }

    #[test]
    fn test_post_activity_covers_six_months() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let posts = vec![
            post_at(Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap()),
            post_at(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()),
            post_at(Utc.with_ymd_and_hms(2023, 12, 24, 9, 0, 0).unwrap()),
            post_at(Utc.with_ymd_and_hms(2023, 8, 1, 9, 0, 0).unwrap()),
        ];

        let stats = post_stats(&posts, now).unwrap();
        assert_eq!(stats.post_count, 4);
        assert_eq!(stats.last_post, Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap());

        let labels: Vec<String> = stats.activity.iter().map(MonthActivity::label).collect();
        assert_eq!(labels, vec!["mar 2024", "feb 2024", "ene 2024", "dic 2023", "nov 2023", "oct 2023"]);
        let counts: Vec<usize> = stats.activity.iter().map(|m| m.count).collect();
        assert_eq!(counts, vec![2, 0, 0, 1, 0, 0]);

        let text = render_post_stats(Some(&stats));
        assert!(text.contains("• mar 2024: █ 2"));
        assert!(text.contains("• feb 2024:  0"));
    }

    #[test]
    fn test_post_stats_without_posts() {
        assert!(post_stats(&[], Utc::now()).is_none());
        assert_eq!(render_post_stats(None), "📭 No hay publicaciones registradas.");
    }
}
