//! Embedded page templates
//!
//! The page shell and its navigation/footer partials are compiled into the
//! binary and rendered with Tera. Section renderers hand the templates
//! pre-escaped HTML fragments, so autoescaping stays off.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Template renderer with the embedded page shell
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Fragments arrive already escaped; URLs and markup must pass through
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("layout.html")),
            ("news.html", include_str!("news.html")),
            ("schedule.html", include_str!("schedule.html")),
            ("partials/head.html", include_str!("partials/head.html")),
            ("partials/nav.html", include_str!("partials/nav.html")),
            (
                "partials/footer.html",
                include_str!("partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render the news page (newsletter archive + blog feed)
    pub fn news_page(&self, site: &SitePageData, news: &NewsPageData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("news", news);
        self.render("news.html", &context)
    }

    /// Render the class schedule page
    pub fn schedule_page(
        &self,
        site: &SitePageData,
        schedule: &SchedulePageData,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("schedule", schedule);
        self.render("schedule.html", &context)
    }
}

/// Site-level context shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct SitePageData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub root: String,
}

impl SitePageData {
    pub fn from_config(config: &crate::config::SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            root: config.root.clone(),
        }
    }
}

/// Context for the news page: all fragments arrive pre-rendered
#[derive(Debug, Clone, Serialize)]
pub struct NewsPageData {
    pub year_options: String,
    pub month_options: String,
    pub download_control: String,
    pub tag_buttons: String,
    /// Attribute-escaped echo of the current search query
    pub query: String,
    pub feed_html: String,
    pub load_more_hidden: bool,
    pub load_more_url: String,
}

/// Context for the schedule page
#[derive(Debug, Clone, Serialize)]
pub struct SchedulePageData {
    pub kids_rows: String,
    pub adult_rows: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SitePageData {
        SitePageData {
            title: "Hi-Yah! Martial Arts".to_string(),
            subtitle: "Kick higher".to_string(),
            description: String::new(),
            root: "/".to_string(),
        }
    }

    #[test]
    fn test_news_page_renders_containers() {
        let renderer = TemplateRenderer::new().unwrap();
        let news = NewsPageData {
            year_options: r#"<option value="2025">2025</option>"#.to_string(),
            month_options: String::new(),
            download_control: String::new(),
            tag_buttons: String::new(),
            query: String::new(),
            feed_html: "<article>one</article>".to_string(),
            load_more_hidden: false,
            load_more_url: "/news/?count=16".to_string(),
        };

        let html = renderer.news_page(&site(), &news).unwrap();
        for id in ["yearSel", "monthSel", "feed", "tagRow", "search", "loadMore"] {
            assert!(html.contains(&format!(r#"id="{}""#, id)), "missing #{}", id);
        }
        assert!(html.contains("<article>one</article>"));
        assert!(!html.contains(" hidden>Load more"));
    }

    #[test]
    fn test_news_page_hides_exhausted_load_more() {
        let renderer = TemplateRenderer::new().unwrap();
        let news = NewsPageData {
            year_options: String::new(),
            month_options: String::new(),
            download_control: String::new(),
            tag_buttons: String::new(),
            query: String::new(),
            feed_html: String::new(),
            load_more_hidden: true,
            load_more_url: "#".to_string(),
        };

        let html = renderer.news_page(&site(), &news).unwrap();
        assert!(html.contains(" hidden>Load more"));
    }

    #[test]
    fn test_schedule_page_renders_rows() {
        let renderer = TemplateRenderer::new().unwrap();
        let schedule = SchedulePageData {
            kids_rows: "<tr><td>Green</td></tr>".to_string(),
            adult_rows: "<tr><td>Black</td></tr>".to_string(),
        };

        let html = renderer.schedule_page(&site(), &schedule).unwrap();
        assert!(html.contains(r#"id="kidsBody""#));
        assert!(html.contains(r#"id="adultBody""#));
        assert!(html.contains("<tr><td>Green</td></tr>"));
    }
}
