use retrocat_protocol::records::{ArticleStatus, CollectionStatus};
use retrocat_protocol::Entity;

use super::{FilterField, FilterKind, FilterPackage, FilterValue, FilterValues};

const SEARCH: FilterField = FilterField {
    key: "search",
    label: "Search",
    kind: FilterKind::Text,
};

pub static GAMES: FilterPackage = FilterPackage::new(
    Entity::Games,
    &[
        SEARCH,
        FilterField {
            key: "platformIds",
            label: "Platforms",
            kind: FilterKind::Ids,
        },
        FilterField {
            key: "genreIds",
            label: "Genres",
            kind: FilterKind::Ids,
        },
        FilterField {
            key: "developerIds",
            label: "Developers",
            kind: FilterKind::Ids,
        },
        FilterField {
            key: "releaseYear",
            label: "Release year",
            kind: FilterKind::NumberRange,
        },
        FilterField {
            key: "rating",
            label: "Rating",
            kind: FilterKind::NumberRange,
        },
    ],
    FilterValues::new,
);

pub static PLATFORMS: FilterPackage = FilterPackage::new(
    Entity::Platforms,
    &[
        SEARCH,
        FilterField {
            key: "manufacturer",
            label: "Manufacturer",
            kind: FilterKind::Text,
        },
        FilterField {
            key: "releaseYear",
            label: "Release year",
            kind: FilterKind::NumberRange,
        },
    ],
    FilterValues::new,
);

pub static GENRES: FilterPackage = FilterPackage::new(Entity::Genres, &[SEARCH], FilterValues::new);

pub static DEVELOPERS: FilterPackage = FilterPackage::new(
    Entity::Developers,
    &[
        SEARCH,
        FilterField {
            key: "country",
            label: "Country",
            kind: FilterKind::Text,
        },
        FilterField {
            key: "foundedYear",
            label: "Founded",
            kind: FilterKind::NumberRange,
        },
    ],
    FilterValues::new,
);

pub static ARTICLES: FilterPackage = FilterPackage::new(
    Entity::Articles,
    &[
        SEARCH,
        FilterField {
            key: "status",
            label: "Status",
            kind: FilterKind::Status(ArticleStatus::VALUES),
        },
        FilterField {
            key: "publishedAt",
            label: "Published",
            kind: FilterKind::DateRange,
        },
        FilterField {
            key: "authorIds",
            label: "Authors",
            kind: FilterKind::Ids,
        },
    ],
    published_articles,
);

pub static COLLECTION: FilterPackage = FilterPackage::new(
    Entity::Collection,
    &[
        SEARCH,
        FilterField {
            key: "status",
            label: "Status",
            kind: FilterKind::Status(CollectionStatus::VALUES),
        },
        FilterField {
            key: "platformIds",
            label: "Platforms",
            kind: FilterKind::Ids,
        },
        FilterField {
            key: "addedAt",
            label: "Added",
            kind: FilterKind::DateRange,
        },
    ],
    FilterValues::new,
);

fn published_articles() -> FilterValues {
    FilterValues::new().with("status", FilterValue::status(ArticleStatus::Published.as_str()))
}

pub fn package_for(entity: Entity) -> &'static FilterPackage {
    match entity {
        Entity::Games => &GAMES,
        Entity::Platforms => &PLATFORMS,
        Entity::Genres => &GENRES,
        Entity::Developers => &DEVELOPERS,
        Entity::Articles => &ARTICLES,
        Entity::Collection => &COLLECTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entity_has_a_matching_package_with_search() {
        for entity in Entity::all() {
            let package = package_for(*entity);
            assert_eq!(package.entity(), *entity);
            assert_eq!(package.fields()[0].key, "search");
        }
    }

    #[test]
    fn declared_keys_are_unique() {
        for entity in Entity::all() {
            let fields = package_for(*entity).fields();
            for (i, field) in fields.iter().enumerate() {
                assert!(
                    fields[i + 1..].iter().all(|other| other.key != field.key),
                    "{entity}: duplicate {}",
                    field.key
                );
            }
        }
    }

    #[test]
    fn articles_default_to_published() {
        let payload = ARTICLES.serialize(&ARTICLES.default_filters()).unwrap();
        assert_eq!(payload["status"], "published");
        assert!(GAMES.default_filters().is_empty());
    }
}
