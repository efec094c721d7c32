//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::archive::Archive;
use crate::helpers::month_name;
use crate::store::Store;
use crate::Site;

/// List site content by type
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    let store = Store::new(&site.config)?;

    match content_type {
        "post" | "posts" => {
            let mut posts = store.load_posts().await;
            posts.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| b.date.cmp(&a.date)));

            println!("Posts ({}):", posts.len());
            for post in posts {
                let mut flags = String::new();
                if post.pinned {
                    flags.push_str(" [pinned]");
                }
                if post.draft {
                    flags.push_str(" [draft]");
                }
                println!("  {} - {}{}", post.date, post.title, flags);
            }
        }

        "tag" | "tags" => {
            let posts = store.load_posts().await;
            let mut tags: HashMap<String, usize> = HashMap::new();
            for post in posts.iter().filter(|p| !p.draft) {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }

            println!("Tags ({}):", tags.len());
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }

        "newsletter" | "newsletters" => {
            let archive = Archive::new(store.load_newsletters().await);
            println!("Newsletters:");
            for year in archive.years() {
                let months = archive
                    .months_for(year)
                    .iter()
                    .map(|&m| month_name(m).map(str::to_string).unwrap_or_else(|| m.to_string()))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("  {}: {}", year, months);
            }
        }

        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, newsletter",
                content_type
            );
        }
    }

    Ok(())
}
