use serde::Deserialize;
use serde_json::Value;

use crate::error::ConsoleError;
use crate::transport::ConsoleTransport;

/// 单页拉取的记录数
pub const DEFAULT_PAGE_SIZE: usize = 500;

#[derive(Debug, Deserialize)]
struct TablePage {
    #[serde(rename = "totalRecords")]
    total_records: usize,
    #[serde(default)]
    records: Vec<Value>,
}

/// 拉取控制台的 JSON 表格数据（分页），返回全部记录。
///
/// 流程：
/// - 先以 `startIndex=-1`、`results=-1` 探测 `totalRecords`，为 0 直接返回空；
/// - 再按 `page_size` 分页，`startIndex` 取已拉取条数，直到凑齐 `totalRecords`；
/// - 某页返回空记录时提前结束，避免控制台计数与实际不一致时死循环。
pub async fn fetch_json_table<T: ConsoleTransport>(
    console: &T,
    path: &str,
    params: &[(&str, String)],
    page_size: usize,
) -> Result<Vec<Value>, ConsoleError> {
    let mut form: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    set_param(&mut form, "dir", "DESC".to_string());
    set_param(&mut form, "startIndex", "-1".to_string());
    set_param(&mut form, "results", "-1".to_string());

    let probe = fetch_page(console, path, &form).await?;
    let total = probe.total_records;
    tracing::debug!("表格 {} 共 {} 条记录", path, total);
    if total == 0 {
        return Ok(Vec::new());
    }

    let page_size = page_size.max(1);
    set_param(&mut form, "results", page_size.to_string());

    let mut rows: Vec<Value> = Vec::with_capacity(total.min(page_size));
    while rows.len() < total {
        set_param(&mut form, "startIndex", rows.len().to_string());
        let page = fetch_page(console, path, &form).await?;
        if page.records.is_empty() {
            tracing::warn!(
                "表格 {} 在 startIndex={} 处返回空页，已拉取 {}/{} 条",
                path,
                rows.len(),
                rows.len(),
                total
            );
            break;
        }
        rows.extend(page.records);
    }
    Ok(rows)
}

async fn fetch_page<T: ConsoleTransport>(
    console: &T,
    path: &str,
    form: &[(String, String)],
) -> Result<TablePage, ConsoleError> {
    let body = console.post_form(path, form).await?.into_success_body()?;
    Ok(serde_json::from_str(&body)?)
}

fn set_param(form: &mut Vec<(String, String)>, key: &str, value: String) {
    match form.iter_mut().find(|(k, _)| k == key) {
        Some(entry) => entry.1 = value,
        None => form.push((key.to_string(), value)),
    }
}
