//! Scaffold a new post file and register it in the post index

use anyhow::Result;
use std::fs;

use crate::content::{Post, PostIndex};
use crate::Site;

/// Create a new post JSON file under the source directory
pub fn run(
    site: &Site,
    title: &str,
    date: Option<&str>,
    tags: &[String],
    summary: Option<&str>,
) -> Result<()> {
    let date = match date {
        Some(date) => date.to_string(),
        None => chrono::Local::now().format("%Y-%m-%d").to_string(),
    };
    let id = post_id(&date, title);

    let posts_dir = site.source_dir.join("news").join("posts");
    fs::create_dir_all(&posts_dir)?;

    let file_path = posts_dir.join(format!("{}.json", id));
    if file_path.exists() {
        anyhow::bail!("Post already exists: {:?}", file_path);
    }

    let post = Post {
        id: id.clone(),
        title: title.to_string(),
        date,
        summary: summary.map(str::to_string),
        body_markdown: Some(String::new()),
        tags: tags.to_vec(),
        ..Default::default()
    };
    fs::write(&file_path, serde_json::to_string_pretty(&post)?)?;

    // Register in the index; newest entries go first
    let index_path = site.source_dir.join(&site.config.posts_index);
    let mut index: PostIndex = match fs::read_to_string(&index_path) {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(_) => PostIndex::default(),
    };

    let entry = format!("news/posts/{}.json", id);
    index.posts.retain(|p| p != &entry);
    index.posts.insert(0, entry);

    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&index_path, serde_json::to_string_pretty(&index)?)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Stable post id: publication date plus the slugified title
pub fn post_id(date: &str, title: &str) -> String {
    format!("{}-{}", date, slug::slugify(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_site(dir: &std::path::Path) -> Site {
        Site::new(dir).unwrap()
    }

    #[test]
    fn test_post_id() {
        assert_eq!(
            post_id("2026-08-06", "Belt Test Results!"),
            "2026-08-06-belt-test-results"
        );
    }

    #[test]
    fn test_creates_post_and_index_entry() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        run(&site, "Summer Camp", Some("2026-06-01"), &["events".to_string()], None).unwrap();

        let post_path = site
            .source_dir
            .join("news/posts/2026-06-01-summer-camp.json");
        let post: Post = serde_json::from_str(&fs::read_to_string(&post_path).unwrap()).unwrap();
        assert_eq!(post.id, "2026-06-01-summer-camp");
        assert_eq!(post.tags, vec!["events"]);
        assert!(!post.draft);

        let index_path = site.source_dir.join(&site.config.posts_index);
        let index: PostIndex =
            serde_json::from_str(&fs::read_to_string(&index_path).unwrap()).unwrap();
        assert_eq!(index.posts[0], "news/posts/2026-06-01-summer-camp.json");
    }

    #[test]
    fn test_new_post_goes_first_in_index() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        run(&site, "First", Some("2026-01-01"), &[], None).unwrap();
        run(&site, "Second", Some("2026-02-01"), &[], None).unwrap();

        let index_path = site.source_dir.join(&site.config.posts_index);
        let index: PostIndex =
            serde_json::from_str(&fs::read_to_string(&index_path).unwrap()).unwrap();
        assert_eq!(index.posts[0], "news/posts/2026-02-01-second.json");
        assert_eq!(index.posts[1], "news/posts/2026-01-01-first.json");
    }

    #[test]
    fn test_duplicate_post_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let site = test_site(dir.path());

        run(&site, "Camp", Some("2026-06-01"), &[], None).unwrap();
        assert!(run(&site, "Camp", Some("2026-06-01"), &[], None).is_err());
    }
}
