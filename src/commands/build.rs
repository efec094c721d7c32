//! Build the static pages

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::archive::Archive;
use crate::feed::{self, render::Feed, FilterState};
use crate::schedule::{self, Schedule};
use crate::store::Store;
use crate::templates::{NewsPageData, SchedulePageData, SitePageData, TemplateRenderer};
use crate::Site;

/// Fetch the site data and render the news and schedule pages
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    fs::create_dir_all(&site.public_dir)?;

    let store = Store::new(&site.config)?;
    let posts = store.load_posts().await;
    let newsletters = store.load_newsletters().await;
    tracing::info!(
        "Loaded {} posts and {} newsletter records",
        posts.len(),
        newsletters.len()
    );

    let renderer = TemplateRenderer::new()?;
    let site_data = SitePageData::from_config(&site.config);

    // News page. The static snapshot renders every visible post up front;
    // batched loading is a preview-server affordance.
    let visible = feed::visible_posts(&posts, &FilterState::default());
    let total = visible.len();
    let mut feed = Feed::new(visible, site.config.per_page, &site.config.date_format);
    let mut feed_html = feed.render_initial();
    while let Some(batch) = feed.load_more() {
        feed_html.push('\n');
        feed_html.push_str(&batch);
    }

    let archive = Archive::new(newsletters);
    let (year, month) = archive.initial_selection().unzip();
    let news = NewsPageData {
        year_options: archive.year_options(year),
        month_options: year
            .map(|y| archive.month_options(y, month))
            .unwrap_or_default(),
        download_control: archive.download_control(year.unwrap_or(0), month.unwrap_or(0)),
        tag_buttons: feed::render::tag_row_html(
            &feed::all_tags(&posts),
            &Default::default(),
            |_| "#".to_string(),
        ),
        query: String::new(),
        feed_html,
        load_more_hidden: true,
        load_more_url: "#".to_string(),
    };
    let html = renderer.news_page(&site_data, &news)?;
    write_page(&site.public_dir.join("news"), &html)?;

    // Schedule page
    let schedule_path = site.source_dir.join(&site.config.schedule_file);
    let schedule = match Schedule::load(&schedule_path) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::warn!("could not load schedule {:?}: {}", schedule_path, e);
            Schedule::default()
        }
    };
    let html = renderer.schedule_page(
        &site_data,
        &SchedulePageData {
            kids_rows: schedule::render_rows(&schedule.kids),
            adult_rows: schedule::render_rows(&schedule.adults),
        },
    )?;
    write_page(&site.public_dir.join("schedule"), &html)?;

    copy_static_files(site)?;

    tracing::info!(
        "Generated {} posts in {:.2}s",
        total,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Write a page as directory/index.html
fn write_page(dir: &Path, html: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("index.html"), html)?;
    Ok(())
}

/// Copy the static site files (assets, partials, data) into the public dir
fn copy_static_files(site: &Site) -> Result<()> {
    if !site.source_dir.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(&site.source_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(&site.source_dir).unwrap_or(path);
        let dest = site.public_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
    }

    Ok(())
}
