use async_graphql::{InputObject, OutputType, SimpleObject};
use serde::Serialize;

use infra::pagination::LimitOffset;

use crate::gql::domains::activity_log::types::ActivityLogEntry;
use crate::gql::domains::biosecurity::types::BiosecurityRecord;
use crate::gql::domains::crop_taxonomy::types::{CropCategory, CropCommodity};
use crate::gql::domains::farm_profiles::types::FarmProfile;
use crate::gql::domains::farmer_profiles::types::FarmerProfile;
use crate::gql::domains::livestock::types::{LivestockRecord, LivestockSpecies};
use crate::gql::domains::production::types::ProductionRecord;
use crate::gql::domains::retail_prices::types::RetailPrice;
use crate::gql::domains::users::types::{User, UserRole};

#[derive(InputObject, Clone, Copy, Debug, Default)]
pub struct PaginationInput {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PaginationInput {
    pub fn to_limit_offset(self) -> LimitOffset {
        LimitOffset::clamped(self.limit.map(i64::from), self.offset.map(i64::from))
    }
}

pub fn page_window(pagination: Option<PaginationInput>) -> LimitOffset {
    pagination.unwrap_or_default().to_limit_offset()
}

#[derive(SimpleObject, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[graphql(concrete(name = "UserRolePage", params(UserRole)))]
#[graphql(concrete(name = "UserPage", params(User)))]
#[graphql(concrete(name = "ActivityLogPage", params(ActivityLogEntry)))]
#[graphql(concrete(name = "FarmerProfilePage", params(FarmerProfile)))]
#[graphql(concrete(name = "FarmProfilePage", params(FarmProfile)))]
#[graphql(concrete(name = "CropCategoryPage", params(CropCategory)))]
#[graphql(concrete(name = "CropCommodityPage", params(CropCommodity)))]
#[graphql(concrete(name = "LivestockSpeciesPage", params(LivestockSpecies)))]
#[graphql(concrete(name = "LivestockRecordPage", params(LivestockRecord)))]
#[graphql(concrete(name = "BiosecurityRecordPage", params(BiosecurityRecord)))]
#[graphql(concrete(name = "RetailPricePage", params(RetailPrice)))]
#[graphql(concrete(name = "ProductionRecordPage", params(ProductionRecord)))]
pub struct PaginatedResponse<T: OutputType> {
    pub items: Vec<T>,
    pub total_count: i32,
    pub page_size: i32,
    pub offset: i32,
    pub has_next_page: bool,
}

impl<T: OutputType> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_count: i64, page: LimitOffset) -> Self {
        let page_size = items.len() as i32;
        let offset = page.offset as i32;
        let total_count = total_count as i32;

        Self {
            items,
            total_count,
            page_size,
            offset,
            has_next_page: (offset + page_size) < total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_to_first_page() {
        let page = page_window(None);
        assert_eq!(page.limit, 50);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn pagination_is_clamped() {
        let page = page_window(Some(PaginationInput {
            limit: Some(5_000),
            offset: Some(-3),
        }));
        assert_eq!(page.limit, 200);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn has_next_page_reflects_remaining_rows() {
        let page = LimitOffset { limit: 2, offset: 2 };
        let response = PaginatedResponse::new(vec![1, 2], 5, page);
        assert_eq!(response.page_size, 2);
        assert!(response.has_next_page);

        let last = PaginatedResponse::new(vec![5], 5, LimitOffset { limit: 2, offset: 4 });
        assert!(!last.has_next_page);
    }
}
