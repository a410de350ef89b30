//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックを開き、シートをカテゴリに変換します。

use calamine::{open_workbook_auto_from_rs, Data, ExcelDateTime, Range, Reader, Sheets};
use std::io::{Cursor, ErrorKind, Read};
use std::path::{Path, PathBuf};

use crate::api::SheetSelector;
use crate::error::SheetPromptError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, Category, Row};

/// Excelで表現できるシリアル値の上限（9999-12-31の翌日）
const MAX_EXCEL_SERIAL: f64 = 2_958_466.0;

/// ワークブックパーサー
///
/// ファイル全体をメモリに読み込んでから解析するため、
/// ファイルハンドルは`open()`から戻る時点で解放されています。
pub(crate) struct WorkbookParser {
    /// エラーメッセージ用の入力パス
    path: PathBuf,
    /// calamineのワークブック（xlsx / xlsm / xlsb / xls / ods）
    workbook: Sheets<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// パスからワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(SheetPromptError::SourceNotFound)` - パスが存在しない場合
    /// * `Err(SheetPromptError::SourceUnreadable)` - 読み込み・解析に失敗した場合
    pub fn open(path: &Path) -> Result<Self, SheetPromptError> {
        let buffer = match std::fs::read(path) {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SheetPromptError::SourceNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(SheetPromptError::unreadable(path, calamine::Error::Io(e))),
        };

        Self::from_bytes(path, buffer)
    }

    /// 任意のリーダーからワークブックを開く
    ///
    /// `label`はエラーメッセージに使用されます。
    pub fn from_reader<R: Read>(label: &Path, mut reader: R) -> Result<Self, SheetPromptError> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|e| SheetPromptError::unreadable(label, calamine::Error::Io(e)))?;

        Self::from_bytes(label, buffer)
    }

    fn from_bytes(path: &Path, buffer: Vec<u8>) -> Result<Self, SheetPromptError> {
        // セキュリティ: ファイルサイズ制限を適用
        SecurityConfig::default().check_input_size(buffer.len() as u64)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))
            .map_err(|e| SheetPromptError::unreadable(path, e))?;

        tracing::debug!(path = %path.display(), "opened workbook");

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    /// すべてのシート名を取得（ワークブック上の順序）
    pub fn get_sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト
    /// * `Err(SheetPromptError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, SheetPromptError> {
        let all_sheet_names = self.get_sheet_names();

        let by_index = |index: usize| {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                SheetPromptError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };
        let by_name = |name: &String| {
            if all_sheet_names.contains(name) {
                Ok(name.clone())
            } else {
                Err(SheetPromptError::Config(format!("Sheet '{}' not found", name)))
            }
        };

        match selector {
            SheetSelector::All => Ok(all_sheet_names.clone()),
            SheetSelector::Index(index) => Ok(vec![by_index(*index)?]),
            SheetSelector::Name(name) => Ok(vec![by_name(name)?]),
            SheetSelector::Indices(indices) => indices.iter().map(|&i| by_index(i)).collect(),
            SheetSelector::Names(names) => names.iter().map(by_name).collect(),
        }
    }

    /// シートをパースしてカテゴリを生成
    ///
    /// 先頭行をヘッダー（列名）として扱い、残りの行をデータ行とします。
    /// 空のシートは行を持たないカテゴリになります。
    pub fn parse_sheet(&mut self, sheet_name: &str) -> Result<Category, SheetPromptError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SheetPromptError::unreadable(&self.path, e))?;

        let category = sheet_to_category(sheet_name, &range);

        tracing::debug!(
            sheet = sheet_name,
            columns = ?category.columns,
            rows = category.rows.len(),
            "parsed sheet"
        );

        Ok(category)
    }
}

/// セル範囲をカテゴリに変換
fn sheet_to_category(sheet_name: &str, range: &Range<Data>) -> Category {
    let mut rows = range.rows();

    let columns = match rows.next() {
        Some(header) => header_names(header),
        None => return Category::new(sheet_name, Vec::new(), Vec::new()),
    };

    let data_rows = rows
        .map(|cells| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, column)| {
                    let value = cells.get(idx).map(to_cell_value).unwrap_or(CellValue::Empty);
                    (column.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Category::new(sheet_name, columns, data_rows)
}

/// ヘッダー行から列名を生成
///
/// 空のヘッダーは `Unnamed: <列番号>`、重複は `名前.1`, `名前.2`, ... とします。
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let raw = to_cell_value(cell).as_raw_string();
        let base = match raw.trim() {
            "" => format!("Unnamed: {}", idx),
            trimmed => trimmed.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

/// calamineのセルを`CellValue`に変換
fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => date_cell_value(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
    }
}

/// 日付書式のセルを変換
///
/// 1904年システムと1900年うるう年バグの補正はcalamineが行います。
/// Excelの範囲外の値（日付書式の付いた電話番号など）は数値のまま残します。
fn date_cell_value(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();
    if !(0.0..MAX_EXCEL_SERIAL).contains(&serial) {
        tracing::debug!(serial, "date cell outside the Excel range, keeping the number");
        return CellValue::Number(serial);
    }

    let converted = if dt.is_duration() {
        dt.as_duration().map(CellValue::Duration)
    } else {
        dt.as_datetime().map(CellValue::DateTime)
    };
    converted.unwrap_or(CellValue::Number(serial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::ExcelDateTimeType;
    use chrono::{Duration, NaiveDate};

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    #[test]
    fn test_header_names_blank_and_duplicates() {
        let header = vec![s("Nom"), Data::Empty, s("Nom"), s(" Nom "), Data::Int(2024)];
        assert_eq!(
            header_names(&header),
            vec!["Nom", "Unnamed: 1", "Nom.1", "Nom.2", "2024"]
        );
    }

    #[test]
    fn test_sheet_to_category() {
        let range = range_from(vec![
            vec![s("Condition"), s("Description")],
            vec![s("Bac STI2D ou général"), Data::Empty],
            vec![Data::Empty, s("Dossier Parcoursup")],
        ]);

        let category = sheet_to_category("Admission", &range);
        assert_eq!(category.name, "Admission");
        assert_eq!(category.columns, vec!["Condition", "Description"]);
        assert_eq!(category.rows.len(), 2);
        assert_eq!(
            category.rows[0].get("Condition"),
            Some(&CellValue::from("Bac STI2D ou général"))
        );
        assert_eq!(category.rows[0].get("Description"), Some(&CellValue::Empty));
        assert_eq!(
            category.rows[1].get("Description"),
            Some(&CellValue::from("Dossier Parcoursup"))
        );
    }

    #[test]
    fn test_sheet_to_category_header_only() {
        let range = range_from(vec![vec![s("Condition")]]);
        let category = sheet_to_category("Admission", &range);
        assert_eq!(category.columns, vec!["Condition"]);
        assert!(category.rows.is_empty());
    }

    #[test]
    fn test_sheet_to_category_empty_sheet() {
        let range: Range<Data> = Range::empty();
        let category = sheet_to_category("", &range);
        assert_eq!(category.name, crate::types::DEFAULT_CATEGORY_NAME);
        assert!(category.columns.is_empty());
        assert!(category.rows.is_empty());
    }

    #[test]
    fn test_to_cell_value() {
        assert_eq!(to_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(to_cell_value(&Data::Float(1.5)), CellValue::Number(1.5));
        assert_eq!(to_cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(to_cell_value(&Data::Empty), CellValue::Empty);
        assert_eq!(to_cell_value(&s("x")), CellValue::from("x"));
    }

    fn date_cell(value: f64, kind: ExcelDateTimeType, is_1904: bool) -> Data {
        Data::DateTime(ExcelDateTime::new(value, kind, is_1904))
    }

    fn ymd(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::DateTime(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_date_cell_1900_system() {
        let cell = |v| to_cell_value(&date_cell(v, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell(1.0), ymd(1900, 1, 1));
        assert_eq!(cell(59.0), ymd(1900, 2, 28));
        assert_eq!(cell(61.0), ymd(1900, 3, 1));
        assert_eq!(cell(45658.0), ymd(2025, 1, 1));
    }

    #[test]
    fn test_date_cell_1904_system() {
        let cell = |v| to_cell_value(&date_cell(v, ExcelDateTimeType::DateTime, true));
        assert_eq!(cell(0.0), ymd(1904, 1, 1));
        assert_eq!(cell(1.0), ymd(1904, 1, 2));
        // 1900年システムの45658と同じ日
        assert_eq!(cell(44196.0), ymd(2025, 1, 1));
    }

    #[test]
    fn test_duration_cell() {
        let value = to_cell_value(&date_cell(1.5, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(value, CellValue::Duration(Duration::hours(36)));
    }

    #[test]
    fn test_date_cell_outside_excel_range_keeps_number() {
        for serial in [1.0e15, 2_958_466.0, -1.0, f64::NAN] {
            let value = to_cell_value(&date_cell(serial, ExcelDateTimeType::DateTime, false));
            match value {
                CellValue::Number(n) if serial.is_nan() => assert!(n.is_nan()),
                CellValue::Number(n) => assert_eq!(n, serial),
                other => panic!("Expected Number, got {:?}", other),
            }
        }

        let value = to_cell_value(&date_cell(1.0e15, ExcelDateTimeType::TimeDelta, false));
        assert_eq!(value, CellValue::Number(1.0e15));
    }

    #[test]
    fn test_last_excel_date() {
        let value = to_cell_value(&date_cell(2_958_465.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(value, ymd(9999, 12, 31));
    }
}
