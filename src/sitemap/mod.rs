//! robots.txt defaults and sitemap.xml generation.

use crate::models::BlogPost;

/// Public pages listed in every sitemap, with their priorities.
const STATIC_ENTRIES: [(&str, &str); 5] = [
    ("/", "1.0"),
    ("/about", "0.8"),
    ("/services", "0.9"),
    ("/contact", "0.7"),
    ("/blog", "0.8"),
];

/// robots.txt served when none has been stored.
pub fn default_robots(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml", site_url)
}

/// Render the sitemap for the static pages plus every published post in `blogs`.
pub fn build_sitemap(site_url: &str, blogs: &[BlogPost]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for (path, priority) in STATIC_ENTRIES {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}{}</loc>\n", escape_xml(site_url), path));
        xml.push_str("    <changefreq>weekly</changefreq>\n");
        xml.push_str(&format!("    <priority>{}</priority>\n", priority));
        xml.push_str("  </url>\n");
    }

    for blog in blogs.iter().filter(|b| b.published) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}/blog/{}</loc>\n",
            escape_xml(site_url),
            escape_xml(&blog.slug)
        ));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod(&blog.updated_at)));
        xml.push_str("    <changefreq>monthly</changefreq>\n");
        xml.push_str("    <priority>0.6</priority>\n");
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Date part of an RFC 3339 timestamp; today when the timestamp is empty.
fn lastmod(updated_at: &str) -> String {
    match updated_at.split('T').next() {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => chrono::Utc::now().format("%Y-%m-%d").to_string(),
    }
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
