use std::cmp::Ordering;

use crate::catalog::repo::Product;
use crate::error::ApiError;

pub const MAX_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortField {
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            "score" => Ok(SortField::Score),
            other => Err(ApiError::Validation(format!(
                "Invalid sort_by field: {other}"
            ))),
        }
    }
}

impl SortDir {
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(ApiError::Validation(format!(
                "Invalid sort_type field: {other}"
            ))),
        }
    }
}

/// Sort one fetched page in place. Floats compare with a total-order
/// fallback so a NaN score cannot panic the sort.
pub fn sort_products(products: &mut [Product], field: SortField, dir: SortDir) {
    products.sort_by(|a, b| {
        let ord = match field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortField::Score => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn product(id: i64, name: &str, price: f64, score: f64) -> Product {
        Product {
            id,
            name: name.into(),
            description: "desc".into(),
            price,
            category: "games".into(),
            release_date: OffsetDateTime::UNIX_EPOCH,
            added_at: OffsetDateTime::UNIX_EPOCH,
            image_url: "http://img".into(),
            score,
        }
    }

    #[test]
    fn parses_valid_sort_params() {
        assert_eq!(SortField::parse("price").unwrap(), SortField::Price);
        assert_eq!(SortDir::parse("desc").unwrap(), SortDir::Desc);
    }

    #[test]
    fn rejects_unknown_sort_field() {
        let err = SortField::parse("added_at").unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort_by field: added_at");
    }

    #[test]
    fn rejects_unknown_sort_type() {
        let err = SortDir::parse("sideways").unwrap_err();
        assert_eq!(err.to_string(), "Invalid sort_type field: sideways");
    }

    #[test]
    fn sorts_by_price_descending() {
        let mut page = vec![
            product(1, "a", 10.0, 5.0),
            product(2, "b", 30.0, 3.0),
            product(3, "c", 20.0, 4.0),
        ];
        sort_products(&mut page, SortField::Price, SortDir::Desc);
        let ids: Vec<i64> = page.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn sorts_by_name_ascending() {
        let mut page = vec![
            product(1, "zelda", 10.0, 5.0),
            product(2, "mario", 30.0, 3.0),
        ];
        sort_products(&mut page, SortField::Name, SortDir::Asc);
        assert_eq!(page[0].name, "mario");
    }
}
