//! Server-rendered HTML pages for dsforum.
//!
//! Pages are plain format strings over a shared layout. All dynamic
//! values pass through [`escape`] before they reach markup.

use chrono::{Datelike, NaiveDateTime, Utc};

use crate::auth::Identity;
use crate::config::SiteConfig;
use crate::forum::{Category, ReplyView, ThreadSummary, ThreadView};

/// Escape a string for safe inclusion in HTML, including attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a string and convert newlines to `<br>` tags.
pub fn nl2br(input: &str) -> String {
    // Normalize CRLF first so the second replace sees one newline form
    escape(input).replace("\r\n", "\n").replace('\n', "<br>\n")
}

/// Format a timestamp the way pages display it, e.g. "Jan 5, 2026".
pub fn format_date(ts: &NaiveDateTime) -> String {
    ts.format("%b %-d, %Y").to_string()
}

fn error_banner(message: Option<&str>) -> String {
    match message {
        Some(msg) => format!("<p class=\"error\">{}</p>\n", escape(msg)),
        None => String::new(),
    }
}

fn nav(identity: Option<&Identity>, show_new_thread: bool) -> String {
    match identity {
        Some(_) if show_new_thread => {
            "<a href=\"/\">Home</a> | <a href=\"/new-thread\">New Thread</a> \
             | <a href=\"/logout\">Logout</a>"
                .to_string()
        }
        Some(_) => "<a href=\"/\">Home</a> | <a href=\"/logout\">Logout</a>".to_string(),
        None => {
            "<a href=\"/\">Home</a> | <a href=\"/login\">Login</a> \
             | <a href=\"/register\">Register</a>"
                .to_string()
        }
    }
}

/// Wrap page content in the shared header/nav/footer layout.
fn layout(site: &SiteConfig, title: &str, nav_html: &str, content: &str) -> String {
    let year = Utc::now().year();
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/styles.css\">\n\
         </head>\n\
         <body>\n\
         <header>\n\
         <h1>{name}</h1>\n\
         <p>{tagline}</p>\n\
         </header>\n\
         <nav>{nav_html}</nav>\n\
         {content}\
         <footer>\n\
         <p>&copy; {year} {name}</p>\n\
         </footer>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
        name = escape(&site.name),
        tagline = escape(&site.tagline),
    )
}

/// The index page: the category list.
pub fn index_page(site: &SiteConfig, identity: Option<&Identity>, categories: &[Category]) -> String {
    let mut items = String::new();
    for category in categories {
        items.push_str(&format!(
            "<div class=\"category\">\n\
             <h3><a href=\"/category/{id}\">{name}</a></h3>\n\
             <p>{description}</p>\n\
             </div>\n",
            id = category.id,
            name = escape(&category.name),
            description = escape(&category.description),
        ));
    }
    let content = format!(
        "<h2>Categories</h2>\n<div class=\"categories\">\n{items}</div>\n"
    );
    layout(site, &site.name, &nav(identity, false), &content)
}

/// A category page: its threads, newest first, with pagination links.
pub fn category_page(
    site: &SiteConfig,
    identity: Option<&Identity>,
    category: &Category,
    threads: &[ThreadSummary],
    page: i64,
    total_pages: i64,
) -> String {
    let mut content = format!(
        "<h2>{name}</h2>\n<p>{description}</p>\n",
        name = escape(&category.name),
        description = escape(&category.description),
    );
    for thread in threads {
        content.push_str(&format!(
            "<div class=\"thread\">\n\
             <h3><a href=\"/thread/{id}\">{title}</a></h3>\n\
             <p>By {username} | {date}</p>\n\
             </div>\n",
            id = thread.id,
            title = escape(&thread.title),
            username = escape(&thread.username),
            date = format_date(&thread.created_at),
        ));
    }
    if total_pages > 1 {
        content.push_str("<div class=\"pagination\">\n");
        for i in 1..=total_pages {
            if i == page {
                content.push_str(&format!("<span>{i}</span>\n"));
            } else {
                content.push_str(&format!(
                    "<a href=\"/category/{id}?page={i}\">{i}</a>\n",
                    id = category.id,
                ));
            }
        }
        content.push_str("</div>\n");
    }
    let title = format!("{} - {}", category.name, site.name);
    layout(site, &title, &nav(identity, true), &content)
}

/// A thread page: the post, its replies oldest first, and the reply form.
pub fn thread_page(
    site: &SiteConfig,
    identity: Option<&Identity>,
    thread: &ThreadView,
    replies: &[ReplyView],
    token: Option<&str>,
    flash: Option<&str>,
) -> String {
    let mut content = format!(
        "<h2>{title}</h2>\n\
         <div class=\"thread\">\n\
         <p>{body}</p>\n\
         <p>In {category} | By {username} | {date}</p>\n\
         </div>\n\
         <h3>Replies</h3>\n",
        title = escape(&thread.title),
        body = nl2br(&thread.body),
        category = escape(&thread.category_name),
        username = escape(&thread.username),
        date = format_date(&thread.created_at),
    );
    for reply in replies {
        content.push_str(&format!(
            "<div class=\"reply\">\n\
             <p>{body}</p>\n\
             <p>By {username} | {date}</p>\n\
             </div>\n",
            body = nl2br(&reply.body),
            username = escape(&reply.username),
            date = format_date(&reply.created_at),
        ));
    }
    content.push_str(&error_banner(flash));
    match (identity, token) {
        (Some(_), Some(token)) => {
            content.push_str(&format!(
                "<h3>Post Reply</h3>\n\
                 <form method=\"post\" action=\"/reply\">\n\
                 <input type=\"hidden\" name=\"token\" value=\"{token}\">\n\
                 <input type=\"hidden\" name=\"thread_id\" value=\"{id}\">\n\
                 <label>Reply: <textarea name=\"body\" required></textarea></label><br>\n\
                 <button type=\"submit\">Reply</button>\n\
                 </form>\n",
                token = escape(token),
                id = thread.id,
            ));
        }
        _ => {
            content.push_str("<p><a href=\"/login\">Login</a> to reply.</p>\n");
        }
    }
    let title = format!("{} - {}", thread.title, site.name);
    layout(site, &title, &nav(identity, true), &content)
}

/// The login form, optionally with an error banner.
pub fn login_page(site: &SiteConfig, token: &str, error: Option<&str>) -> String {
    let content = format!(
        "<h2>Login</h2>\n\
         {error}\
         <form method=\"post\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{token}\">\n\
         <label>Username: <input type=\"text\" name=\"username\" required></label><br>\n\
         <label>Password: <input type=\"password\" name=\"password\" required></label><br>\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n",
        error = error_banner(error),
        token = escape(token),
    );
    let title = format!("Login - {}", site.name);
    layout(site, &title, &nav(None, false), &content)
}

/// The registration form, optionally with an error banner.
pub fn register_page(site: &SiteConfig, token: &str, error: Option<&str>) -> String {
    let content = format!(
        "<h2>Register</h2>\n\
         {error}\
         <form method=\"post\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{token}\">\n\
         <label>Username: <input type=\"text\" name=\"username\" required></label><br>\n\
         <p class=\"help\">3-16 letters only</p>\n\
         <label>Password: <input type=\"password\" name=\"password\" required></label><br>\n\
         <p class=\"help\">8+ chars, must include uppercase, lowercase, number, special char</p>\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n",
        error = error_banner(error),
        token = escape(token),
    );
    let title = format!("Register - {}", site.name);
    layout(site, &title, &nav(None, false), &content)
}

/// The new-thread form, optionally with an error banner.
pub fn new_thread_page(
    site: &SiteConfig,
    identity: Option<&Identity>,
    categories: &[Category],
    token: &str,
    error: Option<&str>,
) -> String {
    let mut options = String::from("<option value=\"\">Select category</option>\n");
    for category in categories {
        options.push_str(&format!(
            "<option value=\"{id}\">{name}</option>\n",
            id = category.id,
            name = escape(&category.name),
        ));
    }
    let content = format!(
        "<h2>Create Thread</h2>\n\
         {error}\
         <form method=\"post\">\n\
         <input type=\"hidden\" name=\"token\" value=\"{token}\">\n\
         <label>Category:\n\
         <select name=\"category_id\" required>\n\
         {options}</select>\n\
         </label><br>\n\
         <label>Title: <input type=\"text\" name=\"title\" required></label><br>\n\
         <label>Body: <textarea name=\"body\" required></textarea></label><br>\n\
         <button type=\"submit\">Create</button>\n\
         </form>\n",
        error = error_banner(error),
        token = escape(token),
    );
    let title = format!("Create Thread - {}", site.name);
    layout(site, &title, &nav(identity, true), &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>\"O'Brien\" & co</b>"),
            "&lt;b&gt;&quot;O&#039;Brien&quot; &amp; co&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(nl2br("a\nb"), "a<br>\nb");
        assert_eq!(nl2br("a\r\nb"), "a<br>\nb");
        assert_eq!(nl2br("<x>\n"), "&lt;x&gt;<br>\n");
    }

    #[test]
    fn test_format_date() {
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 1, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(format_date(&ts), "Jan 5, 2026");
    }

    #[test]
    fn test_index_page_escapes_categories() {
        let categories = vec![Category {
            id: 1,
            name: "<script>".to_string(),
            description: "a & b".to_string(),
        }];
        let html = index_page(&site(), None, &categories);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("/category/1"));
    }

    #[test]
    fn test_nav_logged_out_has_login_links() {
        let html = index_page(&site(), None, &[]);
        assert!(html.contains("/login"));
        assert!(html.contains("/register"));
        assert!(!html.contains("/logout"));
    }

    #[test]
    fn test_nav_logged_in_has_logout() {
        let identity = Identity {
            user_id: 1,
            username: "alice".to_string(),
        };
        let html = index_page(&site(), Some(&identity), &[]);
        assert!(html.contains("/logout"));
        assert!(!html.contains("/register"));
    }

    #[test]
    fn test_login_page_includes_token_and_error() {
        let html = login_page(&site(), "abc123", Some("Invalid credentials"));
        assert!(html.contains("name=\"token\" value=\"abc123\""));
        assert!(html.contains("class=\"error\""));
        assert!(html.contains("Invalid credentials"));

        let html = login_page(&site(), "abc123", None);
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_thread_page_prompts_login_when_anonymous() {
        let thread = ThreadView {
            id: 7,
            user_id: 1,
            category_id: 1,
            title: "Hello".to_string(),
            body: "Line one\nLine two".to_string(),
            created_at: chrono::NaiveDate::from_ymd_opt(2026, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            username: "alice".to_string(),
            category_name: "General Discussion".to_string(),
        };
        let html = thread_page(&site(), None, &thread, &[], None, None);
        assert!(html.contains("Login</a> to reply."));
        assert!(!html.contains("Post Reply"));
        assert!(html.contains("Line one<br>"));

        let identity = Identity {
            user_id: 1,
            username: "alice".to_string(),
        };
        let html = thread_page(&site(), Some(&identity), &thread, &[], Some("tok"), None);
        assert!(html.contains("Post Reply"));
        assert!(html.contains("name=\"thread_id\" value=\"7\""));
    }

    #[test]
    fn test_category_page_pagination() {
        let category = Category {
            id: 2,
            name: "General Discussion".to_string(),
            description: "Talk".to_string(),
        };
        let html = category_page(&site(), None, &category, &[], 2, 3);
        assert!(html.contains("<span>2</span>"));
        assert!(html.contains("/category/2?page=1"));
        assert!(html.contains("/category/2?page=3"));

        let html = category_page(&site(), None, &category, &[], 1, 1);
        assert!(!html.contains("pagination"));
    }
}
