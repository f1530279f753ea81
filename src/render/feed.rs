// src/render/feed.rs

use rss::{ChannelBuilder, GuidBuilder, ImageBuilder, ItemBuilder};

use super::{PostPreview, SiteMeta};

/// RSS 2.0 feed for a tenant's published posts. Item dates are RFC 2822
/// `publishedAt` timestamps; the caller supplies previews already truncated.
pub fn feed_xml(site: &SiteMeta, domain: &str, posts: &[PostPreview]) -> String {
    let site_url = format!("https://{}.{}", site.username, domain);

    let items: Vec<rss::Item> = posts
        .iter()
        .map(|post| {
            let link = format!("{}/{}", site_url, post.slug);
            let description = if post.preview.is_empty() {
                "Preview not available".to_string()
            } else {
                post.preview.clone()
            };
            ItemBuilder::default()
                .title(Some(
                    post.title.clone().unwrap_or_else(|| "Untitled Post".to_string()),
                ))
                .link(Some(link.clone()))
                .description(Some(description))
                .pub_date(Some(post.date.clone()))
                .guid(Some(GuidBuilder::default().value(link).permalink(false).build()))
                .build()
        })
        .collect();

    let mut channel = ChannelBuilder::default()
        .title(site.name.clone())
        .link(site_url)
        .description(site.about.clone().unwrap_or_default())
        .items(items)
        .build();

    if let Some(picture_url) = &site.picture_url {
        channel.set_image(
            ImageBuilder::default()
                .title(site.name.clone())
                .url(picture_url.clone())
                .width(Some("128".to_string()))
                .height(Some("128".to_string()))
                .build(),
        );
    }

    channel.to_string()
}
