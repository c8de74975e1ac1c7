//! `:::drag-drop` bodies.
//!
//! Items come from a nested `:::source` list of `` - `label` - caption ``
//! lines; zones from `{drop-zone:<id>}` markers in a nested
//! `:::html-structure` template. Each zone accepts exactly one item.

use std::sync::LazyLock;

use regex::Regex;

use super::extract::{directives, strip_directives};
use super::text::{fenced_or_plain, split_title};
use crate::types::{DragDropSpec, DropZone, SourceItem};

static SOURCE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s+`([^`]+)`\s*(?:[-–—:：]\s*(.*?))?\s*$").expect("valid regex")
});
static DROP_ZONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{drop-zone:([A-Za-z0-9_-]+)\}").expect("valid regex"));

/// A zone name with its display label and the caption fragments that
/// identify the item it expects.
struct ZoneRule {
    name: &'static str,
    label: &'static str,
    captions: &'static [&'static str],
}

const ZONE_RULES: &[ZoneRule] = &[
    ZoneRule {
        name: "header",
        label: "Header",
        captions: &["header", "页头", "头部", "页眉"],
    },
    ZoneRule {
        name: "nav",
        label: "Navigation",
        captions: &["nav", "导航"],
    },
    ZoneRule {
        name: "main",
        label: "Main content",
        captions: &["main", "主要内容", "主体", "主内容"],
    },
    ZoneRule {
        name: "article",
        label: "Article",
        captions: &["article", "文章"],
    },
    ZoneRule {
        name: "section",
        label: "Section",
        captions: &["section", "章节", "区块"],
    },
    ZoneRule {
        name: "aside",
        label: "Sidebar",
        captions: &["aside", "sidebar", "侧边栏", "侧栏"],
    },
    ZoneRule {
        name: "footer",
        label: "Footer",
        captions: &["footer", "页脚", "底部"],
    },
];

/// Items a zone may hold.
const ZONE_CAPACITY: usize = 1;

pub(crate) fn parse_drag_drop(body: &str) -> DragDropSpec {
    let mut source_items = Vec::new();
    let mut template = String::new();

    for directive in directives(body) {
        match directive.name {
            "source" => {
                source_items = directive
                    .body
                    .lines()
                    .filter_map(|line| SOURCE_ITEM.captures(line))
                    .enumerate()
                    .map(|(idx, caps)| SourceItem {
                        id: format!("item-{}", idx + 1),
                        content: caps[1].trim().to_string(),
                        caption: caps
                            .get(2)
                            .map(|m| m.as_str().trim().to_string())
                            .unwrap_or_default(),
                    })
                    .collect();
            }
            "html-structure" => template = fenced_or_plain(directive.body),
            other => tracing::debug!(name = other, "ignoring unknown drag-drop section"),
        }
    }

    let zone_ids: Vec<String> = DROP_ZONE
        .captures_iter(&template)
        .map(|caps| caps[1].to_string())
        .fold(Vec::new(), |mut ids, id| {
            if !ids.contains(&id) {
                ids.push(id);
            }
            ids
        });
    let drop_zones = assign_items(&zone_ids, &source_items);

    let (title, description) = split_title(&strip_directives(body));

    DragDropSpec {
        title: title.unwrap_or_else(|| "Drag and drop".to_string()),
        description,
        source_items,
        drop_zones,
        template,
    }
}

/// Resolve each zone's accepted item: first through the caption table, then
/// by handing remaining zones the remaining items in source order.
fn assign_items(zone_ids: &[String], items: &[SourceItem]) -> Vec<DropZone> {
    let mut claimed = vec![false; items.len()];
    let mut accepted: Vec<Option<usize>> = vec![None; zone_ids.len()];

    for (zone_idx, zone_id) in zone_ids.iter().enumerate() {
        let Some(rule) = zone_rule(zone_id) else {
            continue;
        };
        let hit = items.iter().enumerate().position(|(idx, item)| {
            let caption = item.caption.to_lowercase();
            !claimed[idx] && rule.captions.iter().any(|f| caption.contains(f))
        });
        if let Some(idx) = hit {
            claimed[idx] = true;
            accepted[zone_idx] = Some(idx);
        }
    }

    for slot in accepted.iter_mut().filter(|slot| slot.is_none()) {
        if let Some(idx) = claimed.iter().position(|c| !c) {
            claimed[idx] = true;
            *slot = Some(idx);
        }
    }

    zone_ids
        .iter()
        .zip(accepted)
        .map(|(zone_id, item)| DropZone {
            id: zone_id.clone(),
            label: zone_rule(zone_id)
                .map(|rule| rule.label.to_string())
                .unwrap_or_else(|| zone_id.replace(['-', '_'], " ")),
            accepted_items: item.map(|idx| items[idx].id.clone()).into_iter().collect(),
            max_items: ZONE_CAPACITY,
        })
        .collect()
}

fn zone_rule(zone_id: &str) -> Option<&'static ZoneRule> {
    let zone_id = zone_id.to_lowercase();
    ZONE_RULES.iter().find(|rule| zone_id.contains(rule.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"**Build the page skeleton**

Drag each tag into place.

:::source
- `<footer>` - 页面底部信息
- `<header>` - 页面头部区域
- `<div>` - generic wrapper
:::

:::html-structure
```html
<body>
  {drop-zone:header}
  {drop-zone:content}
  {drop-zone:footer}
</body>
```
:::
"#;

    #[test]
    fn parse_items_and_zones() {
        let spec = parse_drag_drop(BODY);
        assert_eq!(spec.title, "Build the page skeleton");
        assert_eq!(spec.description, "Drag each tag into place.");
        assert_eq!(spec.source_items.len(), 3);
        assert_eq!(spec.source_items[1].content, "<header>");
        assert_eq!(spec.source_items[1].caption, "页面头部区域");
        assert!(spec.template.contains("{drop-zone:content}"));

        let zones: Vec<_> = spec
            .drop_zones
            .iter()
            .map(|z| (z.id.as_str(), z.accepted_items.clone()))
            .collect();
        assert_eq!(
            zones,
            vec![
                ("header", vec!["item-2".to_string()]),
                ("content", vec!["item-3".to_string()]),
                ("footer", vec!["item-1".to_string()]),
            ]
        );
        assert!(spec.drop_zones.iter().all(|z| z.max_items == 1));
        assert_eq!(spec.drop_zones[0].label, "Header");
    }

    #[test]
    fn unmatched_zones_fall_back_to_source_order() {
        let body = ":::source\n- `a` - first\n- `b` - second\n:::\n:::html-structure\n{drop-zone:x} {drop-zone:y}\n:::\n";
        let spec = parse_drag_drop(body);
        assert_eq!(spec.drop_zones[0].accepted_items, vec!["item-1"]);
        assert_eq!(spec.drop_zones[1].accepted_items, vec!["item-2"]);
        assert_eq!(spec.title, "Drag and drop");
    }
}
