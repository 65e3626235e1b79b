use std::{ops::Deref, sync::OnceLock};

use scraper::Selector;

/// A CSS selector literal compiled on first use.
#[derive(Debug)]
pub(super) struct StaticSelector {
    compiled: OnceLock<Selector>,
    css: &'static str,
}

impl StaticSelector {
    pub(super) const fn new(css: &'static str) -> Self {
        Self {
            compiled: OnceLock::new(),
            css,
        }
    }
}

impl Deref for StaticSelector {
    type Target = Selector;

    fn deref(&self) -> &Selector {
        self.compiled.get_or_init(|| {
            Selector::parse(self.css)
                .unwrap_or_else(|e| panic!("Error parsing static selector {}: {e:?}", self.css))
        })
    }
}

#[macro_export]
macro_rules! static_selector {
    ($x: ident <- $sel: literal) => {
        static $x: $crate::parse::static_selector::StaticSelector =
            $crate::parse::static_selector::StaticSelector::new($sel);
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_selects_through_deref() {
        static_selector!(ITEM_NAME <- "ul.items > li .item-name");
        let html = scraper::Html::parse_fragment(
            "<ul class=\"items\"><li><span class=\"item-name\">Toast</span></li></ul>",
        );
        assert_eq!(html.select(&ITEM_NAME).count(), 1);
    }
}
