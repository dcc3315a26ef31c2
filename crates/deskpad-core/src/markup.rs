use crate::item::TodoItem;
use crate::render::{EMPTY_MESSAGE, status_label};

pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn item_row(item: &TodoItem) -> String {
    let class = if item.completed {
        "todo-item completed"
    } else {
        "todo-item"
    };
    let checked = if item.completed { " checked" } else { "" };

    let mut row = String::new();
    row.push_str(&format!("  <li class=\"{}\" data-id=\"{}\">\n", class, item.id));
    row.push_str(&format!(
        "    <input type=\"checkbox\" class=\"todo-checkbox\"{checked}>\n"
    ));
    row.push_str(&format!(
        "    <span class=\"todo-text\">{}</span>\n",
        escape_text(&item.text)
    ));
    row.push_str("    <div class=\"todo-actions\">\n");
    row.push_str("      <button class=\"edit-btn\">✏️</button>\n");
    row.push_str("      <button class=\"delete-btn\">🗑️</button>\n");
    row.push_str("    </div>\n");
    row.push_str("  </li>\n");
    row
}

pub fn list_fragment(items: &[&TodoItem]) -> String {
    if items.is_empty() {
        return format!("  <li class=\"empty-message\">{EMPTY_MESSAGE}</li>\n");
    }
    items.iter().map(|item| item_row(item)).collect()
}

pub fn page_fragment(items: &[&TodoItem], active_count: usize) -> String {
    let mut page = String::new();
    page.push_str("<ul class=\"todo-list\">\n");
    page.push_str(&list_fragment(items));
    page.push_str("</ul>\n");
    page.push_str(&format!(
        "<span class=\"task-count\">{}</span>\n",
        status_label(active_count)
    ));
    page
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn item(text: &str, completed: bool) -> TodoItem {
        let now = Utc
            .with_ymd_and_hms(2024, 5, 4, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut item = TodoItem::new(text.to_string(), now);
        item.completed = completed;
        item
    }

    #[test]
    fn item_text_is_escaped() {
        let spiky = item("<script>alert(\"x\") & 'more'</script>", false);
        let html = list_fragment(&[&spiky]);
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;more&#39;&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn completed_items_get_class_and_checked_attribute() {
        let done = item("ship it", true);
        let open = item("write docs", false);
        let html = list_fragment(&[&done, &open]);
        assert!(html.contains("class=\"todo-item completed\""));
        assert!(html.contains("class=\"todo-checkbox\" checked>"));
        assert_eq!(html.matches(" checked>").count(), 1);
    }

    #[test]
    fn empty_view_renders_the_placeholder() {
        let html = list_fragment(&[]);
        assert!(html.contains("class=\"empty-message\""));
        assert!(html.contains(EMPTY_MESSAGE));
        assert!(!html.contains("todo-item"));
    }

    #[test]
    fn page_fragment_carries_the_pending_count() {
        let open = item("water plants", false);
        let html = page_fragment(&[&open], 1);
        assert!(html.starts_with("<ul class=\"todo-list\">"));
        assert!(html.contains(&format!("data-id=\"{}\"", open.id)));
        assert!(html.contains("<span class=\"task-count\">1 task(s) pending</span>"));
    }
}
