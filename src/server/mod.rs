//! Preview server
//!
//! Renders the news pages with a fresh data load per request (the content's
//! no-store contract) and falls back to the static site files for everything
//! else. Overlapping loads are serialized by the store's generation guard.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::archive::Archive;
use crate::config::SiteConfig;
use crate::feed::{self, render::Feed, FilterState};
use crate::helpers::{encode_query, html_escape, url_for};
use crate::schedule::{self, Schedule};
use crate::store::{Store, StoreHandle};
use crate::templates::{NewsPageData, SchedulePageData, SitePageData, TemplateRenderer};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    store: Store,
    posts: StoreHandle,
    renderer: TemplateRenderer,
}

/// Query parameters accepted by the news routes
#[derive(Debug, Default, Deserialize)]
struct NewsQuery {
    /// Comma-separated active tags
    tags: Option<String>,
    /// Free-text search query
    q: Option<String>,
    /// Newsletter archive selection
    year: Option<i32>,
    month: Option<u32>,
    /// Id of a card rendered with its body expanded
    open: Option<String>,
    /// Number of cards the client already shows (page target)
    count: Option<usize>,
    /// Offset for the load-more fragment
    offset: Option<usize>,
}

/// Start the preview server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let store = Store::new(&site.config)?;

    let state = Arc::new(ServerState {
        site: site.clone(),
        store: store.clone(),
        posts: StoreHandle::new(store),
        renderer: TemplateRenderer::new()?,
    });

    let serve_dir = ServeDir::new(&site.source_dir).append_index_html_on_directories(true);

    let app = Router::new()
        .route("/news", get(news_page))
        .route("/news/", get(news_page))
        .route("/news/feed", get(feed_fragment))
        .route("/news/archive", get(archive_fragment))
        .route("/schedule", get(schedule_page))
        .route("/schedule/", get(schedule_page))
        .fallback_service(serve_dir)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Render the full news page: newsletter archive plus the paginated feed
async fn news_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    let config = &state.site.config;

    state.posts.refresh().await;
    let posts = state.posts.posts().await;
    let newsletters = state.store.load_newsletters().await;
    let archive = Archive::new(newsletters);

    let filter = filter_from(&query);
    let visible = feed::visible_posts(&posts, &filter);
    let mut feed = Feed::new(visible, config.per_page, &config.date_format);

    if let Some(open) = &query.open {
        feed.toggle(open);
    }

    // Re-render up to the client's card count so open cards survive a reload
    let target = query.count.unwrap_or(config.per_page).min(feed.total());
    let mut feed_html = feed.render_initial();
    while feed.rendered() < target {
        match feed.load_more() {
            Some(batch) => {
                feed_html.push('\n');
                feed_html.push_str(&batch);
            }
            None => break,
        }
    }

    let selection = match (query.year, query.month) {
        (Some(year), Some(month)) => Some((year, month)),
        (Some(year), None) => archive.months_for(year).first().map(|&m| (year, m)),
        _ => archive.initial_selection(),
    };
    let (year, month) = selection.unzip();

    let tag_buttons = feed::render::tag_row_html(
        &feed::all_tags(&posts),
        &filter.active_tags,
        |tag| {
            let mut toggled = filter.active_tags.clone();
            if !toggled.remove(tag) {
                toggled.insert(tag.to_string());
            }
            news_url(config, &toggled, &filter.query, None)
        },
    );

    let news = NewsPageData {
        year_options: archive.year_options(year),
        month_options: year
            .map(|y| archive.month_options(y, month))
            .unwrap_or_default(),
        download_control: archive.download_control(year.unwrap_or(0), month.unwrap_or(0)),
        tag_buttons,
        query: html_escape(&filter.query),
        feed_html,
        load_more_hidden: feed.load_more_hidden(),
        load_more_url: news_url(
            config,
            &filter.active_tags,
            &filter.query,
            Some(feed.rendered() + config.per_page),
        ),
    };

    let site_data = SitePageData::from_config(config);
    match state.renderer.news_page(&site_data, &news) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("news page render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "render error").into_response()
        }
    }
}

/// Return the next batch of post cards as a bare HTML fragment
async fn feed_fragment(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    let config = &state.site.config;

    state.posts.refresh().await;
    let posts = state.posts.posts().await;

    let filter = filter_from(&query);
    let visible = feed::visible_posts(&posts, &filter);
    let mut feed = Feed::new(visible, config.per_page, &config.date_format);

    feed.resume_at(query.offset.unwrap_or(config.per_page));
    let batch = feed.load_more().unwrap_or_default();
    Html(batch).into_response()
}

/// Return the month selector and download control for one year
async fn archive_fragment(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<NewsQuery>,
) -> Response {
    let newsletters = state.store.load_newsletters().await;
    let archive = Archive::new(newsletters);

    let year = query
        .year
        .or_else(|| archive.years().first().copied())
        .unwrap_or(0);
    let month = query
        .month
        .or_else(|| archive.months_for(year).first().copied());

    let fragment = format!(
        r#"<select id="monthSel" name="month">{}</select>{}"#,
        archive.month_options(year, month),
        archive.download_control(year, month.unwrap_or(0))
    );
    Html(fragment).into_response()
}

/// Render the class schedule page from the local schedule data file
async fn schedule_page(State(state): State<Arc<ServerState>>) -> Response {
    let site = &state.site;
    let schedule_path = site.source_dir.join(&site.config.schedule_file);
    let schedule = match Schedule::load(&schedule_path) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::warn!("could not load schedule {:?}: {}", schedule_path, e);
            Schedule::default()
        }
    };

    let data = SchedulePageData {
        kids_rows: schedule::render_rows(&schedule.kids),
        adult_rows: schedule::render_rows(&schedule.adults),
    };

    let site_data = SitePageData::from_config(&site.config);
    match state.renderer.schedule_page(&site_data, &data) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("schedule page render failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "render error").into_response()
        }
    }
}

/// Build filter state from the request's query parameters
fn filter_from(query: &NewsQuery) -> FilterState {
    let mut filter = FilterState::default();

    if let Some(tags) = &query.tags {
        filter.active_tags = tags
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(q) = &query.q {
        filter.query = q.trim().to_string();
    }

    filter
}

/// Build a news page URL carrying the filter state
fn news_url(
    config: &SiteConfig,
    tags: &BTreeSet<String>,
    query: &str,
    count: Option<usize>,
) -> String {
    let mut url = url_for(config, "news/");
    let mut params = Vec::new();

    if !tags.is_empty() {
        let joined = tags
            .iter()
            .map(|tag| encode_query(tag))
            .collect::<Vec<_>>()
            .join(",");
        params.push(format!("tags={}", joined));
    }
    if !query.is_empty() {
        params.push(format!("q={}", encode_query(query)));
    }
    if let Some(count) = count {
        params.push(format!("count={}", count));
    }

    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}
