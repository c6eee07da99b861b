use std::path::PathBuf;

use xml_tree_core::parse_file;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_root_attributes_and_nested_elements() {
    let node = parse_file(&fixture("fixtures/ip_hosts.xml")).expect("parse should succeed");
    assert_eq!(node.tag, "Configuration");
    assert_eq!(
        node.attributes.get("APIVersion"),
        Some(&"1905.1".to_string())
    );

    let hosts = node.get_children("IPHost");
    assert_eq!(hosts.len(), 5);
    assert_eq!(hosts[0].get_text(&["Name"]), Some("web-01"));
    assert_eq!(hosts[0].attributes.get("transactionid"), Some(&String::new()));

    let group = node.find_descendant("IPHostGroup").expect("group should exist");
    let list = group.get_child("HostList").expect("host list should exist");
    assert_eq!(list.get_children("Host").len(), 2);
}

#[test]
fn empty_elements_have_no_text() {
    let node = parse_file(&fixture("fixtures/fqdn_hosts.xml")).expect("parse should succeed");
    let group = node
        .descendants_with_tag("FQDNHostGroup")
        .nth(1)
        .expect("second group");
    let description = group.get_child("Description").expect("description");
    assert!(description.text.is_none());
    assert!(description.children.is_empty());
}
