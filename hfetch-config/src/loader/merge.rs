use toml::map::Entry;

/// Lay `overlay` over `base` in place.
///
/// Where both sides hold a table the two are combined key by key; everywhere
/// else the overlay value is taken as is.
pub fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) =
        (&mut *base, overlay)
    {
        for (key, overlay_value) in overlay_table {
            match base_table.entry(key.as_str()) {
                Entry::Occupied(mut slot) => merge_toml_values(slot.get_mut(), overlay_value),
                Entry::Vacant(slot) => {
                    slot.insert(overlay_value.clone());
                }
            }
        }
        return;
    }

    *base = overlay.clone();
}
