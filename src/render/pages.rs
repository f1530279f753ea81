// src/render/pages.rs
//
// Built-in maud implementation of the Renderer. Templates are deliberately
// plain: structure and forms only, visual design lives in /assets
// stylesheets. All dynamic values are escaped by maud; the two PreEscaped
// sites are sanitized markdown output and the owner's own head HTML.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::{DashboardPost, Page, PostPreview, Renderer, SiteMeta};

pub struct HtmlPages;

impl Renderer for HtmlPages {
    fn render(&self, page: &Page) -> String {
        match page {
            Page::Home => home(),
            Page::Login { username, error } => login(username, *error),
            Page::Register { name, username, email, error } => {
                register(name, username, email, error.as_deref())
            }
            Page::Dashboard {
                name,
                username,
                email,
                picture_url,
                link,
                posts,
                tip,
                activated,
            } => dashboard(
                name,
                username,
                email,
                picture_url.as_deref(),
                link.as_deref(),
                posts,
                tip.as_deref(),
                *activated,
            ),
            Page::Profile { name, about, link } => {
                profile(name, about.as_deref(), link.as_deref())
            }
            Page::Email { email } => email_page(email),
            Page::Password { error } => password(error.as_deref()),
            Page::CustomHtml { html } => custom_html(html.as_deref()),
            Page::Logout => logout(),
            Page::NewPost { username, error } => new_post(username, error.as_deref()),
            Page::ViewPost { slug, username, title, content_html, draft, views } => {
                view_post(slug, username, title.as_deref(), content_html.as_deref(), *draft, *views)
            }
            Page::DeletePost { slug } => delete_post(slug),
            Page::EditPost { slug, title, content } => {
                edit_post(slug, title.as_deref(), content.as_deref())
            }
            Page::SiteHome { site, posts } => site_home(site, posts),
            Page::SitePost { site, slug, title, date, content_html } => {
                site_post(site, slug, title.as_deref(), date, content_html.as_deref())
            }
        }
        .into_string()
    }
}

fn shell(title: &str, head: Option<&str>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                title { (title) }
                meta name="viewport" content="width=device-width, initial-scale=1";
                link rel="stylesheet" href="/assets/style.css";
                @if let Some(head) = head {
                    (PreEscaped(head))
                }
            }
            body { (body) }
        }
    }
}

fn home() -> Markup {
    shell("make a blog", None, html! {
        h1 { "make a blog" }
        p { "Your own blog on your own subdomain." }
        p {
            a href="/register" { "Register" }
            " or "
            a href="/login" { "log in" }
            "."
        }
    })
}

fn login(username: &str, error: bool) -> Markup {
    shell("log in", None, html! {
        h1 { "Log in" }
        @if error {
            p class="error" { "Wrong username or password." }
        }
        form method="post" action="/login" {
            input name="username" placeholder="username or email" value=(username);
            input name="password" type="password" placeholder="password";
            button type="submit" { "Log in" }
        }
        p { a href="/register" { "No account yet? Register." } }
    })
}

fn register_error_text(code: &str) -> &'static str {
    match code {
        "fields_empty" => "Please fill in every field.",
        "name_max_length" => "That name is too long.",
        "username_max_length" => "Usernames can be at most 16 characters.",
        "username_min_length" => "Usernames need at least 3 characters.",
        "email_max_length" => "That email address is too long.",
        "username_chars" => "Usernames can only contain lowercase letters and digits.",
        "email_chars" => "That email address doesn't look right.",
        "username_taken" => "That username is taken.",
        "email_taken" => "That email address is already in use.",
        _ => "Something went wrong, please try again later.",
    }
}

fn register(name: &str, username: &str, email: &str, error: Option<&str>) -> Markup {
    shell("register", None, html! {
        h1 { "Register" }
        @if let Some(code) = error {
            p class="error" { (register_error_text(code)) }
        }
        form method="post" action="/register" {
            input name="name" placeholder="display name" value=(name);
            input name="username" placeholder="username" value=(username);
            input name="email" placeholder="email" value=(email);
            input name="password" type="password" placeholder="password";
            button type="submit" { "Register" }
        }
        p { a href="/login" { "Already registered? Log in." } }
    })
}

#[allow(clippy::too_many_arguments)]
fn dashboard(
    name: &str,
    username: &str,
    email: &str,
    picture_url: Option<&str>,
    link: Option<&str>,
    posts: &[DashboardPost],
    tip: Option<&str>,
    activated: bool,
) -> Markup {
    shell("dashboard", None, html! {
        header {
            @if let Some(url) = picture_url {
                img class="avatar" src=(url) alt=(name);
            }
            h1 { (name) }
            p { (username) " · " (email) }
            @if let Some(link) = link {
                p { a href={ "https://" (link) } { (link) } }
            }
        }
        @if !activated {
            p class="notice" {
                "Your blog isn't public yet. "
                a href="/activate" { "Activate it" }
                " to go live."
            }
        }
        @if let Some(tip) = tip {
            p class="tip" { (tip) }
        }
        nav {
            a href="/new" { "New Post" }
            " · " a href="/profile" { "Edit Profile" }
            " · " a href="/email" { "Change Email" }
            " · " a href="/password" { "Change Password" }
            " · " a href="/html" { "Custom HTML" }
            " · " a href="/logout" { "Log Out" }
        }
        form method="post" action="/picture" class="picture-form" {
            input type="hidden" name="picture";
            button type="submit" { "+" }
        }
        ul class="posts" {
            @for post in posts {
                li {
                    a href={ "/post/" (post.slug) } {
                        (post.title.as_deref().unwrap_or("Untitled Post"))
                    }
                    " · " (post.date)
                    @if post.draft {
                        " " span class="draft" { "draft" }
                    }
                }
            }
        }
    })
}

fn profile(name: &str, about: Option<&str>, link: Option<&str>) -> Markup {
    shell("edit profile", None, html! {
        h1 { "Edit Profile" }
        form method="post" action="/profile" {
            input name="name" placeholder="display name" value=(name);
            textarea name="about" placeholder="about you" { (about.unwrap_or("")) }
            input name="link" placeholder="a link to find you elsewhere" value=(link.unwrap_or(""));
            button type="submit" { "Save" }
        }
    })
}

fn email_page(email: &str) -> Markup {
    shell("change email", None, html! {
        h1 { "Change Email" }
        form method="post" action="/email" {
            input name="email" value=(email);
            button type="submit" { "Save" }
        }
    })
}

fn password(error: Option<&str>) -> Markup {
    shell("change password", None, html! {
        h1 { "Change Password" }
        @if let Some(code) = error {
            p class="error" {
                @match code {
                    "match" => { "The new passwords don't match." }
                    "old" => { "That old password is wrong." }
                    _ => { "Something went wrong." }
                }
            }
        }
        form method="post" action="/password" {
            input name="old" type="password" placeholder="old password";
            input name="password" type="password" placeholder="new password";
            input name="password2" type="password" placeholder="new password again";
            button type="submit" { "Save" }
        }
    })
}

fn custom_html(value: Option<&str>) -> Markup {
    shell("custom html", None, html! {
        h1 { "Custom HTML" }
        p { "Injected into the head of your public pages." }
        form method="post" action="/html" {
            textarea name="html" { (value.unwrap_or("")) }
            button type="submit" { "Save" }
        }
    })
}

fn logout() -> Markup {
    shell("log out", None, html! {
        h1 { "Log Out" }
        form method="post" action="/logout" {
            button type="submit" { "Log out" }
        }
    })
}

fn new_post(username: &str, error: Option<&str>) -> Markup {
    shell("new post", None, html! {
        h1 { "New Post" }
        @if let Some(code) = error {
            p class="error" {
                @match code {
                    "length" => { "Slugs can be at most 32 characters." }
                    "chars" => { "Slugs can only contain lowercase letters, digits and hyphens." }
                    "unique" => { "You already have a post with that slug." }
                    _ => { "Something went wrong." }
                }
            }
        }
        form method="post" action="/new" {
            label { (username) ".../" }
            input name="slug" placeholder="my-first-post";
            button type="submit" { "Create" }
        }
    })
}

fn view_post(
    slug: &str,
    username: &str,
    title: Option<&str>,
    content_html: Option<&str>,
    draft: bool,
    views: Option<i64>,
) -> Markup {
    shell(title.unwrap_or("Untitled Post"), None, html! {
        nav {
            a href="/dashboard" { "Dashboard" }
            " · " a href={ "/post/" (slug) "/edit" } { "Edit" }
            " · " a href={ "/post/" (slug) "/delete" } { "Delete" }
        }
        h1 { (title.unwrap_or("Untitled Post")) }
        @if draft {
            p class="draft" { "Draft. Only you can see this." }
            form method="post" action={ "/post/" (slug) "/publish" } {
                button type="submit" { "Publish" }
            }
        } @else {
            p { (username) ".../" (slug) " · " (views.unwrap_or(0)) " views" }
        }
        article {
            @if let Some(content) = content_html {
                (PreEscaped(content))
            }
        }
    })
}

fn delete_post(slug: &str) -> Markup {
    shell("delete post", None, html! {
        h1 { "Delete Post" }
        p { "Deleting \"" (slug) "\" cannot be undone, and the slug stays reserved." }
        form method="post" action={ "/post/" (slug) "/delete" } {
            button type="submit" { "Delete forever" }
        }
    })
}

fn edit_post(slug: &str, title: Option<&str>, content: Option<&str>) -> Markup {
    shell("edit post", None, html! {
        h1 { "Edit Post" }
        form method="post" action={ "/post/" (slug) "/edit" } {
            input name="title" placeholder="title" value=(title.unwrap_or(""));
            textarea name="content" placeholder="write in markdown" {
                (content.unwrap_or(""))
            }
            button type="submit" { "Save" }
        }
    })
}

fn site_header(site: &SiteMeta) -> Markup {
    html! {
        header {
            @if let Some(url) = &site.picture_url {
                img class="avatar" src=(url) alt=(site.name);
            }
            h1 { a href="/" { (site.name) } }
            @if let Some(about) = &site.about {
                p { (about) }
            }
            @if let Some(link) = &site.link {
                p { a href={ "https://" (link) } rel="me" { (link) } }
            }
        }
    }
}

fn site_home(site: &SiteMeta, posts: &[PostPreview]) -> Markup {
    shell(&site.name, site.html.as_deref(), html! {
        (site_header(site))
        ul class="posts" {
            @for post in posts {
                li {
                    a href={ "/" (post.slug) } {
                        (post.title.as_deref().unwrap_or("Untitled Post"))
                    }
                    " · " (post.date)
                    p { (post.preview) }
                }
            }
        }
        a href="/feed.xml" { "RSS" }
    })
}

fn site_post(
    site: &SiteMeta,
    slug: &str,
    title: Option<&str>,
    date: &str,
    content_html: Option<&str>,
) -> Markup {
    let title = title.unwrap_or("Untitled Post");
    shell(title, site.html.as_deref(), html! {
        (site_header(site))
        h2 { (title) }
        p { (date) }
        article {
            @if let Some(content) = content_html {
                (PreEscaped(content))
            }
        }
        meta property="og:image" content={ "/" (slug) "/card.png" };
    })
}
