// src/render/mod.rs
//
// The Renderer collaborator: typed page data in, markup out. Pure functions
// of their input; the core never inspects the markup. The built-in
// implementation uses maud (compile-time templates, automatic escaping).

mod feed;
mod pages;

pub use feed::feed_xml;
pub use pages::HtmlPages;

use chrono::{DateTime, Datelike, Utc};

/// Tenant metadata shared by the public page templates.
#[derive(Debug, Clone)]
pub struct SiteMeta {
    pub name: String,
    pub username: String,
    pub about: Option<String>,
    pub picture_url: Option<String>,
    pub link: Option<String>,
    pub html: Option<String>,
}

/// A post row on the public listing or in the feed.
#[derive(Debug, Clone)]
pub struct PostPreview {
    pub slug: String,
    pub title: Option<String>,
    pub preview: String,
    pub date: String,
}

/// A post row on the owner dashboard.
#[derive(Debug, Clone)]
pub struct DashboardPost {
    pub slug: String,
    pub title: Option<String>,
    pub date: String,
    pub draft: bool,
}

/// Every page the core can ask the renderer for.
#[derive(Debug)]
pub enum Page {
    Home,
    Login {
        username: String,
        error: bool,
    },
    Register {
        name: String,
        username: String,
        email: String,
        error: Option<String>,
    },
    Dashboard {
        name: String,
        username: String,
        email: String,
        picture_url: Option<String>,
        link: Option<String>,
        posts: Vec<DashboardPost>,
        tip: Option<String>,
        activated: bool,
    },
    Profile {
        name: String,
        about: Option<String>,
        link: Option<String>,
    },
    Email {
        email: String,
    },
    Password {
        error: Option<String>,
    },
    CustomHtml {
        html: Option<String>,
    },
    Logout,
    NewPost {
        username: String,
        error: Option<String>,
    },
    ViewPost {
        slug: String,
        username: String,
        title: Option<String>,
        content_html: Option<String>,
        draft: bool,
        views: Option<i64>,
    },
    DeletePost {
        slug: String,
    },
    EditPost {
        slug: String,
        title: Option<String>,
        content: Option<String>,
    },
    SiteHome {
        site: SiteMeta,
        posts: Vec<PostPreview>,
    },
    SitePost {
        site: SiteMeta,
        slug: String,
        title: Option<String>,
        date: String,
        content_html: Option<String>,
    },
}

pub trait Renderer: Send + Sync {
    fn render(&self, page: &Page) -> String;
}

/// Human date for pages: `January 3rd 2026`.
pub fn format_date(d: &DateTime<Utc>) -> String {
    const MONTHS: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    let day = d.day();
    let suffix = match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    };

    format!("{} {}{} {}", MONTHS[d.month0() as usize], day, suffix, d.year())
}

/// Listing/feed preview: first 512 chars, at most 3 lines, trimmed.
pub fn preview(content: Option<&str>) -> String {
    let Some(content) = content else {
        return String::new();
    };

    let text = crate::utils::validate::truncate_chars(content, 512).trim_end();
    if text.lines().count() > 3 {
        text.lines().take(3).collect::<Vec<_>>().join("\n").trim_end().to_string()
    } else {
        text.to_string()
    }
}
