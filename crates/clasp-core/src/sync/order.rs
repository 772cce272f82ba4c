//! Push ordering

use clasp_fs::NormalizedPath;

/// Paths listed in `push_order` first, in that order, then the rest in scan order
///
/// Entries of `push_order` that were not scanned are ignored, and a path listed
/// twice is only sent once.
pub fn order_for_push(scanned: &[String], push_order: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(scanned.len());

    for wanted in push_order {
        let wanted = NormalizedPath::new(wanted);
        if let Some(path) = scanned.iter().find(|p| p.as_str() == wanted.as_str())
            && !ordered.contains(path)
        {
            ordered.push(path.clone());
        }
    }

    for path in scanned {
        if !ordered.contains(path) {
            ordered.push(path.clone());
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_order_keeps_scan_order() {
        let scanned = strings(&["Code.gs", "appsscript.json", "lib/a.gs"]);
        assert_eq!(order_for_push(&scanned, &[]), scanned);
    }

    #[test]
    fn test_listed_files_go_first() {
        let scanned = strings(&["Code.gs", "appsscript.json", "lib/a.gs", "lib/b.gs"]);
        let order = strings(&["lib/b.gs", "./lib/a.gs"]);
        assert_eq!(
            order_for_push(&scanned, &order),
            strings(&["lib/b.gs", "lib/a.gs", "Code.gs", "appsscript.json"])
        );
    }

    #[test]
    fn test_unknown_and_repeated_entries_are_dropped() {
        let scanned = strings(&["A.gs", "B.gs"]);
        let order = strings(&["missing.gs", "B.gs", "B.gs"]);
        assert_eq!(order_for_push(&scanned, &order), strings(&["B.gs", "A.gs"]));
    }
}
