use nav_sync::navigation::{build_navigation_items, missing_parents, NavigationItem, DEFAULT_TARGET};
use nav_sync::table::Row;
use serde_json::json;

fn row(name: &str, link: &str, parent_name: &str) -> Row {
    Row {
        name: name.to_string(),
        link: link.to_string(),
        parent_name: parent_name.to_string(),
        ..Row::default()
    }
}

#[test]
fn test_home_about_team_example() {
    let rows = vec![
        row("Home", "/home", ""),
        row("About", "/about", ""),
        row("Team", "/about/team", "About"),
    ];

    let items = build_navigation_items(&rows);

    assert_eq!(
        serde_json::to_value(&items).unwrap(),
        json!([
            {"name": "Home", "link": "/home", "target": "_self", "description": ""},
            {
                "name": "About",
                "link": "/about",
                "target": "_self",
                "description": "",
                "children": [
                    {"name": "Team", "link": "/about/team", "target": "_self", "description": ""}
                ]
            }
        ])
    );
}

#[test]
fn test_root_rows_keep_row_order() {
    let rows = vec![
        row("Zeta", "/z", ""),
        row("Child", "/c", "Alpha"),
        row("Alpha", "/a", ""),
        row("Mid", "/m", " "),
    ];

    let names: Vec<String> = build_navigation_items(&rows)
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
}

#[test]
fn test_missing_parents_become_placeholders_in_first_seen_order() {
    let rows = vec![
        row("Home", "/home", ""),
        row("Policies", "/hr/policies", " HR "),
        row("Wiki", "/it/wiki", "IT"),
        row("Benefits", "/hr/benefits", "HR"),
    ];

    assert_eq!(missing_parents(&rows), vec!["HR".to_string(), "IT".to_string()]);

    let items = build_navigation_items(&rows);
    assert_eq!(items.len(), 3);

    let hr = &items[1];
    assert_eq!(hr.name, "HR");
    assert_eq!(hr.link, "");
    assert_eq!(hr.description, "");
    assert_eq!(hr.target, DEFAULT_TARGET);
    let hr_children: Vec<&str> = hr
        .children
        .as_ref()
        .expect("HR placeholder should carry children")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(hr_children, vec!["Policies", "Benefits"]);

    assert_eq!(items[2].name, "IT");
    assert_eq!(items[2].child_count(), 1);
}

#[test]
fn test_target_defaults_only_when_empty() {
    let empty = row("Empty", "/e", "");
    let mut spaces = row("Spaces", "/s", "");
    spaces.target = " ".to_string();
    let mut explicit = row("External", "https://example.com", "");
    explicit.target = "_blank".to_string();
    explicit.description = "Opens elsewhere".to_string();

    let items = build_navigation_items(&[empty, spaces, explicit]);
    assert_eq!(items[0].target, "_self");
    assert_eq!(items[1].target, " ", "whitespace-only target is passed through");
    assert_eq!(items[2].target, "_blank");
    assert_eq!(items[2].description, "Opens elsewhere");
}

#[test]
fn test_children_match_on_trimmed_names_but_keep_raw_fields() {
    let rows = vec![
        row(" Docs ", "/docs", ""),
        row("Guides ", "/docs/guides", "Docs"),
    ];

    let items = build_navigation_items(&rows);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, " Docs ");
    let children = items[0].children.as_ref().unwrap();
    assert_eq!(children[0].name, "Guides ");
    assert!(children[0].children.is_none());
}

#[test]
fn test_grandchildren_are_not_nested() {
    let rows = vec![
        row("Top", "/top", ""),
        row("Middle", "/top/middle", "Top"),
        row("Bottom", "/top/middle/bottom", "Middle"),
    ];

    let items = build_navigation_items(&rows);
    assert_eq!(items.len(), 1, "Middle exists as a row, so no placeholder is made");
    let middle = &items[0].children.as_ref().unwrap()[0];
    assert_eq!(middle.name, "Middle");
    assert!(middle.children.is_none());
}

#[test]
fn test_duplicate_names_share_children() {
    let rows = vec![
        row("Shared", "/one", ""),
        row("Shared", "/two", ""),
        row("Leaf", "/leaf", "Shared"),
    ];

    let items = build_navigation_items(&rows);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].child_count(), 1);
    assert_eq!(items[1].child_count(), 1);
}

#[test]
fn test_blank_name_row_adopts_every_top_level_row() {
    let rows = vec![
        row("", "/nowhere", ""),
        row("Home", "/home", ""),
        row("Team", "/team", "Home"),
    ];

    let items = build_navigation_items(&rows);
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "");
    let adopted: Vec<&str> = items[0]
        .children
        .as_ref()
        .expect("blank-named item matches rows with a blank parent")
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(adopted, vec!["", "Home"]);
    assert!(items[0].children.as_ref().unwrap()[1].children.is_none());
    assert_eq!(items[1].child_count(), 1);
}

#[test]
fn test_childless_items_omit_children_key() {
    let item = NavigationItem::placeholder("Lonely");
    let value = serde_json::to_value(&item).unwrap();
    assert!(value.get("children").is_none());
    assert_eq!(value["target"], "_self");
}

#[test]
fn test_empty_input_builds_nothing() {
    assert!(build_navigation_items(&[]).is_empty());
}
