//! Column definitions and per-entity render overrides.

mod render;
mod sets;

use retrocat_protocol::listing::Record;
use retrocat_protocol::Entity;
use serde_json::Value;

pub use render::{date_only, join_names, nested_name, plain, rating};
pub use sets::columns_for;

/// Renders the value found under a column's field into display text.
pub type Renderer = fn(Option<&Value>) -> String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub field: &'static str,
    pub header: &'static str,
    pub sortable: bool,
    pub align: Align,
    pub render: Renderer,
}

impl ColumnDef {
    pub const fn new(field: &'static str, header: &'static str) -> Self {
        Self {
            field,
            header,
            sortable: true,
            align: Align::Left,
            render: plain,
        }
    }

    pub const fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    pub const fn rendered_with(mut self, render: Renderer) -> Self {
        self.render = render;
        self
    }

    pub fn render_cell(&self, record: &Record) -> String {
        (self.render)(record.get(self.field))
    }
}

/// Ordered columns displayed for an entity's table.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    entity: Entity,
    columns: Vec<ColumnDef>,
}

impl ColumnSet {
    pub fn new(entity: Entity, columns: Vec<ColumnDef>) -> Self {
        Self { entity, columns }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.field == field)
    }

    pub fn is_sortable(&self, field: &str) -> bool {
        self.column(field).is_some_and(|column| column.sortable)
    }

    /// Keeps only the named columns, in the order given. Unknown names are returned as errors.
    pub fn select<S: AsRef<str>>(&self, fields: &[S]) -> Result<ColumnSet, String> {
        let mut columns = Vec::with_capacity(fields.len());
        for field in fields {
            let field = field.as_ref();
            let column = self
                .column(field)
                .ok_or_else(|| format!("{} has no column '{}'", self.entity, field))?;
            columns.push(*column);
        }
        Ok(ColumnSet::new(self.entity, columns))
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.header.to_string())
            .collect()
    }

    pub fn render_row(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| column.render_cell(record))
            .collect()
    }

    pub fn render_rows(&self, records: &[Record]) -> Vec<Vec<String>> {
        records.iter().map(|record| self.render_row(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("record must be an object"),
        }
    }

    #[test]
    fn games_join_related_platform_names() {
        let columns = columns_for(Entity::Games);
        let row = columns.render_row(&record(json!({
            "id": 12,
            "title": "Donkey Kong Country",
            "releaseYear": 1994,
            "rating": 8.75,
            "developer": {"id": 4, "name": "Rare"},
            "platforms": [{"id": 1, "name": "SNES"}, {"id": 2, "name": "Game Boy Advance"}],
            "genres": []
        })));
        assert_eq!(
            columns.headers(),
            vec!["ID", "Title", "Year", "Rating", "Developer", "Platforms", "Genres"]
        );
        assert_eq!(
            row,
            vec!["12", "Donkey Kong Country", "1994", "8.8", "Rare", "SNES, Game Boy Advance", ""]
        );
    }

    #[test]
    fn missing_fields_render_empty() {
        let columns = columns_for(Entity::Articles);
        let row = columns.render_row(&record(json!({"id": 3, "title": "Top 10 RPGs"})));
        assert_eq!(row[1], "Top 10 RPGs");
        assert!(row[2..].iter().all(String::is_empty));
    }

    #[test]
    fn select_reorders_and_validates() {
        let columns = columns_for(Entity::Platforms);
        let picked = columns.select(&["name", "id"]).unwrap();
        assert_eq!(picked.headers(), vec!["Name", "ID"]);
        assert!(columns.select(&["cpu"]).is_err());
    }

    #[test]
    fn relation_columns_are_not_sortable() {
        let columns = columns_for(Entity::Games);
        assert!(columns.is_sortable("title"));
        assert!(!columns.is_sortable("platforms"));
        assert!(!columns.is_sortable("nonexistent"));
    }
}
