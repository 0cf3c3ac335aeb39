use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(super) static $name: LazyLock<Selector> =
            LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

// First column of the depot file listing.
selector!(FILE_TREE_NAME_CELL, "table.file-tree tbody tr td:first-child");
selector!(JSON_SCRIPT, r#"script[type="application/json"]"#);
selector!(TABLE_CELL, "td");
