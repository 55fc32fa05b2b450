use crate::runtime::item::Item;

/// Full, unfiltered read of the backing table.
pub trait TableScanner {
    fn table_name(&self) -> &str;

    fn scan_items(&self) -> Result<Vec<Item>, String>;
}
