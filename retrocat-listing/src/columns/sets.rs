use retrocat_protocol::Entity;

use super::render::{date_only, join_names, nested_name, rating};
use super::{ColumnDef, ColumnSet};

const ID: ColumnDef = ColumnDef::new("id", "ID").right();

pub fn columns_for(entity: Entity) -> ColumnSet {
    let columns = match entity {
        Entity::Games => vec![
            ID,
            ColumnDef::new("title", "Title"),
            ColumnDef::new("releaseYear", "Year").right(),
            ColumnDef::new("rating", "Rating")
                .right()
                .rendered_with(rating),
            ColumnDef::new("developer", "Developer")
                .unsortable()
                .rendered_with(nested_name),
            ColumnDef::new("platforms", "Platforms")
                .unsortable()
                .rendered_with(join_names),
            ColumnDef::new("genres", "Genres")
                .unsortable()
                .rendered_with(join_names),
        ],
        Entity::Platforms => vec![
            ID,
            ColumnDef::new("name", "Name"),
            ColumnDef::new("manufacturer", "Manufacturer"),
            ColumnDef::new("releaseYear", "Year").right(),
        ],
        Entity::Genres => vec![
            ID,
            ColumnDef::new("name", "Name"),
            ColumnDef::new("description", "Description").unsortable(),
        ],
        Entity::Developers => vec![
            ID,
            ColumnDef::new("name", "Name"),
            ColumnDef::new("country", "Country"),
            ColumnDef::new("foundedYear", "Founded").right(),
        ],
        Entity::Articles => vec![
            ID,
            ColumnDef::new("title", "Title"),
            ColumnDef::new("status", "Status"),
            ColumnDef::new("author", "Author")
                .unsortable()
                .rendered_with(nested_name),
            ColumnDef::new("publishedAt", "Published").rendered_with(date_only),
        ],
        Entity::Collection => vec![
            ColumnDef::new("game", "Game")
                .unsortable()
                .rendered_with(nested_name),
            ColumnDef::new("platform", "Platform")
                .unsortable()
                .rendered_with(nested_name),
            ColumnDef::new("status", "Status"),
            ColumnDef::new("addedAt", "Added").rendered_with(date_only),
        ],
    };
    ColumnSet::new(entity, columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entity_has_a_sortable_column() {
        for entity in Entity::all() {
            let set = columns_for(*entity);
            assert_eq!(set.entity(), *entity);
            assert!(set.columns().iter().any(|column| column.sortable), "{entity}");
        }
    }
}
