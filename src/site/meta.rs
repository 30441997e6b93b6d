//! Page metadata: static defaults, API overrides and `<head>` rendering.

use serde_json::{json, Value};

use crate::models::{BlogPost, SeoRecord, DEFAULT_AUTHOR};

/// Canonical public origin of the site.
pub const DEFAULT_ORIGIN: &str = "https://techresona.com";

const SITE_NAME: &str = "TechResona";
const DEFAULT_BLOG_IMAGE: &str = "https://techresona.com/default-blog-image.jpg";
const ROBOTS_DIRECTIVES: &str =
    "index, follow, max-snippet:-1, max-image-preview:large, max-video-preview:-1";

/// Public pages that carry their own metadata defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKey {
    Home,
    About,
    Services,
    Contact,
    Blog,
    Terms,
    Privacy,
}

impl PageKey {
    /// Key of the SEO record that may override the defaults. Pages without one never fetch.
    pub fn seo_key(&self) -> Option<&'static str> {
        match self {
            PageKey::Home => Some("home"),
            PageKey::About => Some("about"),
            PageKey::Services => Some("services"),
            PageKey::Contact => Some("contact"),
            PageKey::Blog | PageKey::Terms | PageKey::Privacy => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            PageKey::Home => "/",
            PageKey::About => "/about",
            PageKey::Services => "/services",
            PageKey::Contact => "/contact",
            PageKey::Blog => "/blog",
            PageKey::Terms => "/terms",
            PageKey::Privacy => "/privacy",
        }
    }
}

/// Everything the page head needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Comma-separated; empty renders no keywords tag
    pub keywords: String,
    pub canonical: Option<String>,
    pub og_image: Option<String>,
    pub og_type: &'static str,
    pub json_ld: Option<Value>,
}

impl PageMeta {
    /// Static metadata of `page`, used for the first render and whenever the fetch fails.
    pub fn defaults(page: PageKey, origin: &str) -> Self {
        let (title, description, keywords) = match page {
            PageKey::Home => (
                "TechResona Pvt Ltd - Cloud Solutions & Managed Services | Azure, AWS, Office 365",
                "Leading IT services provider in India offering Azure, AWS, Office 365, and Managed Services. Secure, scalable cloud solutions for SMBs and enterprises.",
                "azure cloud solutions for small business, aws cloud solutions for small business, office 365 licensing for small business, managed services, IT services india",
            ),
            PageKey::About => (
                "About TechResona - Leading Cloud Solutions Provider in India",
                "Learn about TechResona's mission to empower businesses with secure, scalable cloud solutions. Trusted partner for Azure, AWS, and managed services.",
                "about techresona, cloud provider india, IT services company, azure partner, aws partner, microsoft azure consulting small business",
            ),
            PageKey::Services => (
                "TechResona Services - Azure, AWS, Office 365, SEO & Web Development",
                "Explore TechResona's comprehensive services: Azure Cloud, AWS Solutions, Office 365, Managed Services, Website Development, and SEO optimization for businesses in India and globally.",
                "azure cloud solutions for small business, aws cloud solutions for small business, office 365 licensing for small business, managed services india, small business website development, power bi consulting services",
            ),
            PageKey::Contact => (
                "Contact TechResona - Get Cloud Solutions for Your Business",
                "Get in touch with TechResona for Azure, AWS, Office 365, and managed services. Contact us for a free consultation on your cloud transformation needs.",
                "contact techresona, cloud consultation, IT services inquiry, azure support, aws help",
            ),
            PageKey::Blog => (
                "TechResona Blog - Cloud, Azure & AWS Insights for Growing Businesses",
                "Guides and insights on cloud migration, Azure and AWS cost optimization, Office 365 and managed IT services from the TechResona team.",
                "cloud blog, azure tips, aws guides, office 365 insights, managed services india",
            ),
            PageKey::Terms => (
                "Terms and Conditions | TechResona",
                "Read TechResona's terms and conditions. Learn about our service agreement, user responsibilities, and terms of use for our cloud solutions and managed services.",
                "terms and conditions, service agreement, terms of use, TechResona terms",
            ),
            PageKey::Privacy => (
                "Privacy Policy | TechResona",
                "Learn how TechResona collects, uses, and protects your personal information. Read our comprehensive privacy policy for cloud services and managed IT solutions.",
                "privacy policy, data protection, information security, TechResona privacy",
            ),
        };

        let json_ld = match page {
            PageKey::Home => Some(home_schema(origin)),
            _ => None,
        };

        Self {
            title: title.to_string(),
            description: description.to_string(),
            keywords: keywords.to_string(),
            canonical: Some(format!("{}{}", origin, page.path())),
            og_image: None,
            og_type: "website",
            json_ld,
        }
    }

    /// Replace every field the record carries. Missing or blank fields keep the current value.
    pub fn apply(&mut self, record: &SeoRecord) {
        if let Some(title) = non_blank(&record.title) {
            self.title = title;
        }
        if let Some(description) = non_blank(&record.description) {
            self.description = description;
        }
        if let Some(keywords) = non_blank(&record.keywords) {
            self.keywords = keywords;
        }
        if let Some(og_image) = non_blank(&record.og_image) {
            self.og_image = Some(og_image);
        }
        if let Some(json_ld) = record.json_ld.as_ref().filter(|v| !v.is_null()) {
            self.json_ld = Some(json_ld.clone());
        }
    }

    /// Metadata of a blog article page.
    pub fn for_blog(post: &BlogPost, origin: &str) -> Self {
        let description = if post.meta_description.trim().is_empty() {
            post.excerpt.clone()
        } else {
            post.meta_description.clone()
        };
        let url = format!("{}/blog/{}", origin, post.slug);
        let author = if post.author.trim().is_empty() {
            DEFAULT_AUTHOR
        } else {
            post.author.as_str()
        };

        let json_ld = json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": post.title,
            "description": post.excerpt,
            "image": post.featured_image.as_deref().unwrap_or(DEFAULT_BLOG_IMAGE),
            "author": {
                "@type": "Organization",
                "name": author,
                "url": origin,
            },
            "publisher": {
                "@type": "Organization",
                "name": SITE_NAME,
                "logo": {
                    "@type": "ImageObject",
                    "url": format!("{}/logo.png", origin),
                },
            },
            "datePublished": post.created_at,
            "dateModified": post.updated_at,
            "mainEntityOfPage": {
                "@type": "WebPage",
                "@id": url,
            },
            "keywords": post.keywords,
            "articleBody": post.content,
        });

        Self {
            title: format!("{} | TechResona Blog", post.title),
            description,
            keywords: post.keywords.clone(),
            canonical: Some(url),
            og_image: post.featured_image.clone(),
            og_type: "article",
            json_ld: Some(json_ld),
        }
    }

    /// Render the `<head>` fragment for this page.
    pub fn render_head(&self) -> String {
        let title = escape_html(&self.title);
        let description = escape_html(&self.description);
        let mut head = String::new();

        head.push_str(&format!("<title>{}</title>\n", title));
        head.push_str(&meta_name("description", &description));
        if !self.keywords.trim().is_empty() {
            head.push_str(&meta_name("keywords", &escape_html(&self.keywords)));
        }
        if let Some(canonical) = &self.canonical {
            head.push_str(&format!(
                "<link rel=\"canonical\" href=\"{}\">\n",
                escape_html(canonical)
            ));
        }

        head.push_str(&meta_property("og:title", &title));
        head.push_str(&meta_property("og:description", &description));
        if let Some(image) = &self.og_image {
            head.push_str(&meta_property("og:image", &escape_html(image)));
        }
        head.push_str(&meta_property("og:type", self.og_type));
        if let Some(canonical) = &self.canonical {
            head.push_str(&meta_property("og:url", &escape_html(canonical)));
        }
        head.push_str(&meta_property("og:site_name", SITE_NAME));

        head.push_str(&meta_name("twitter:card", "summary_large_image"));
        head.push_str(&meta_name("twitter:title", &title));
        head.push_str(&meta_name("twitter:description", &description));
        if let Some(image) = &self.og_image {
            head.push_str(&meta_name("twitter:image", &escape_html(image)));
        }

        head.push_str(&meta_name("robots", ROBOTS_DIRECTIVES));
        head.push_str(&meta_name("author", SITE_NAME));

        if let Some(json_ld) = &self.json_ld {
            // `</` would close the script element early.
            let payload = json_ld.to_string().replace("</", "<\\/");
            head.push_str(&format!(
                "<script type=\"application/ld+json\">{}</script>\n",
                payload
            ));
        }

        head
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

fn meta_name(name: &str, content: &str) -> String {
    format!("<meta name=\"{}\" content=\"{}\">\n", name, content)
}

fn meta_property(property: &str, content: &str) -> String {
    format!("<meta property=\"{}\" content=\"{}\">\n", property, content)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn home_schema(origin: &str) -> Value {
    let logo = format!("{}/logo.png", origin);
    json!([
        {
            "@context": "https://schema.org",
            "@type": "Organization",
            "name": "TechResona Pvt Ltd",
            "alternateName": SITE_NAME,
            "description": "Leading IT services provider in India offering Azure, AWS, Office 365, and Managed Services.",
            "url": origin,
            "logo": logo,
            "email": "info@techresona.com",
            "telephone": "+917517402788",
            "address": {
                "@type": "PostalAddress",
                "addressCountry": "IN",
                "addressRegion": "India"
            }
        },
        {
            "@context": "https://schema.org",
            "@type": "LocalBusiness",
            "name": "TechResona Pvt Ltd",
            "alternateName": SITE_NAME,
            "image": logo,
            "@id": origin,
            "url": origin,
            "telephone": "+917517402788",
            "email": "info@techresona.com",
            "priceRange": "$$",
            "address": {
                "@type": "PostalAddress",
                "addressCountry": "IN"
            }
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SeoRecord {
        SeoRecord {
            id: "seo-1".into(),
            page: "about".into(),
            title: Some("About us".into()),
            description: Some("Who we are".into()),
            keywords: None,
            og_image: None,
            json_ld: Some(json!({"@type": "AboutPage"})),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_defaults_are_never_blank() {
        for page in [
            PageKey::Home,
            PageKey::About,
            PageKey::Services,
            PageKey::Contact,
            PageKey::Blog,
            PageKey::Terms,
            PageKey::Privacy,
        ] {
            let meta = PageMeta::defaults(page, DEFAULT_ORIGIN);
            assert!(!meta.title.is_empty());
            assert!(!meta.description.is_empty());
            assert_eq!(
                meta.canonical.as_deref(),
                Some(format!("{}{}", DEFAULT_ORIGIN, page.path()).as_str())
            );
        }
    }

    #[test]
    fn test_only_home_has_default_structured_data() {
        let home = PageMeta::defaults(PageKey::Home, DEFAULT_ORIGIN);
        assert_eq!(home.json_ld.as_ref().and_then(Value::as_array).map(Vec::len), Some(2));
        assert!(PageMeta::defaults(PageKey::About, DEFAULT_ORIGIN).json_ld.is_none());
    }

    #[test]
    fn test_apply_overrides_present_fields_only() {
        let defaults = PageMeta::defaults(PageKey::About, DEFAULT_ORIGIN);
        let mut meta = defaults.clone();
        meta.apply(&record());

        assert_eq!(meta.title, "About us");
        assert_eq!(meta.description, "Who we are");
        assert_eq!(meta.keywords, defaults.keywords);
        assert_eq!(meta.json_ld, Some(json!({"@type": "AboutPage"})));
    }

    #[test]
    fn test_apply_ignores_blank_fields() {
        let defaults = PageMeta::defaults(PageKey::Contact, DEFAULT_ORIGIN);
        let mut meta = defaults.clone();
        meta.apply(&SeoRecord {
            title: Some("   ".into()),
            json_ld: Some(Value::Null),
            ..record()
        });
        assert_eq!(meta.title, defaults.title);
        assert!(meta.json_ld.is_none());
    }

    #[test]
    fn test_blog_meta() {
        let post: BlogPost = serde_json::from_value(json!({
            "slug": "azure-tips",
            "title": "Azure Tips",
            "excerpt": "Save money",
            "content": "Body",
            "keywords": "azure, cost",
            "meta_description": "",
            "author": "",
            "created_at": "2025-01-01T00:00:00.000000Z",
            "updated_at": "2025-01-02T00:00:00.000000Z"
        }))
        .unwrap();

        let meta = PageMeta::for_blog(&post, DEFAULT_ORIGIN);
        assert_eq!(meta.title, "Azure Tips | TechResona Blog");
        assert_eq!(meta.description, "Save money");
        assert_eq!(meta.og_type, "article");
        let ld = meta.json_ld.unwrap();
        assert_eq!(ld["@type"], "BlogPosting");
        assert_eq!(ld["image"], DEFAULT_BLOG_IMAGE);
        assert_eq!(ld["author"]["name"], DEFAULT_AUTHOR);
        assert_eq!(ld["mainEntityOfPage"]["@id"], "https://techresona.com/blog/azure-tips");
    }

    #[test]
    fn test_render_head_escapes_values() {
        let mut meta = PageMeta::defaults(PageKey::About, DEFAULT_ORIGIN);
        meta.title = "Tips & \"Tricks\" <2025>".into();
        meta.json_ld = Some(json!({"name": "</script><script>alert(1)"}));

        let head = meta.render_head();
        assert!(head.contains("<title>Tips &amp; &quot;Tricks&quot; &lt;2025&gt;</title>"));
        assert!(head.contains("<link rel=\"canonical\" href=\"https://techresona.com/about\">"));
        assert!(head.contains("<meta property=\"og:site_name\" content=\"TechResona\">"));
        assert!(!head.contains("</script><script>"));
        assert!(head.contains("application/ld+json"));
    }

    #[test]
    fn test_render_head_skips_empty_keywords() {
        let mut meta = PageMeta::defaults(PageKey::Terms, DEFAULT_ORIGIN);
        meta.keywords = String::new();
        assert!(!meta.render_head().contains("name=\"keywords\""));
    }
}
