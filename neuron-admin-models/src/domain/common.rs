use serde::{Deserialize, Serialize};

/// 1-based pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: u32,
    pub page_size: u32,
}

impl PageParams {
    #[inline]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub pages: u32,
    pub records: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T: Clone> PageResult<T> {
    /// Slice `data` to the requested page, `(page - 1) * size .. page * size`.
    pub fn paginate(data: &[T], params: PageParams) -> Self {
        let params = PageParams::new(params.page, params.page_size);
        let size = params.page_size as usize;
        let start = (params.page as usize - 1).saturating_mul(size);
        let records = data.iter().skip(start).take(size).cloned().collect();
        let total = data.len() as u64;
        Self {
            pages: total.div_ceil(size as u64) as u32,
            records,
            total,
            page: params.page,
            page_size: params.page_size,
        }
    }
}
