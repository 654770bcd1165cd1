use calamine::{open_workbook_auto, Data, Reader};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::model::ProductRecord;

pub fn load_records(path: &str, outlets: &[String]) -> Result<Vec<ProductRecord>, LoadError> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
                path: path.to_string(),
                source: e,
            })?;
            load_csv(file, path, outlets)?
        }
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, outlets)?,
        other => return Err(LoadError::UnsupportedFormat(format!(".{other}"))),
    };

    info!("loaded {} product rows from {}", records.len(), path);
    Ok(records)
}

pub fn load_csv<R: Read>(
    reader: R,
    path: &str,
    outlets: &[String],
) -> Result<Vec<ProductRecord>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LoadError::Csv {
            path: path.to_string(),
            source: e,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    let columns = resolve_columns(&headers, outlets)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping unreadable row: {e}");
                skipped += 1;
                continue;
            }
        };
        let cells: Vec<String> = row.iter().map(str::to_string).collect();
        match build_record(&columns, &cells) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("skipped {skipped} rows without a product name");
    }
    Ok(records)
}

fn load_workbook(path: &str, outlets: &[String]) -> Result<Vec<ProductRecord>, LoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LoadError::Workbook {
        path: path.to_string(),
        source: e,
    })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::EmptyWorkbook(path.to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Workbook {
            path: path.to_string(),
            source: e,
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|c| normalize_header(&cell_text(c))).collect(),
        None => return Ok(Vec::new()),
    };
    let columns = resolve_columns(&headers, outlets)?;

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        if let Some(record) = build_record(&columns, &cells) {
            records.push(record);
        }
    }
    Ok(records)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

struct Columns {
    name: usize,
    category: Option<usize>,
    brand: Option<usize>,
    net_total: Option<usize>,
    cost: Option<usize>,
    profit: Option<usize>,
    // (configured outlet name, column index) pairs actually present
    sold: Vec<(String, usize)>,
    stock: Vec<(String, usize)>,
}

// Header matching is case- and whitespace-insensitive; the file may use the
// Spanish names of the original sheets or their English equivalents.
fn resolve_columns(headers: &[String], outlets: &[String]) -> Result<Columns, LoadError> {
    let find = |candidates: &[&str]| -> Option<usize> {
        headers.iter().position(|h| candidates.contains(&h.as_str()))
    };

    let name = find(&["nombre", "producto", "name"])
        .ok_or_else(|| LoadError::MissingColumn("nombre".to_string()))?;

    let mut sold = Vec::new();
    let mut stock = Vec::new();
    for outlet in outlets {
        let key = outlet.trim().to_lowercase();
        if let Some(idx) = headers.iter().position(|h| *h == format!("{key} vendido")) {
            sold.push((outlet.clone(), idx));
        } else {
            debug!("no '{key} vendido' column in the data");
        }
        if let Some(idx) = headers.iter().position(|h| *h == format!("{key} inventario")) {
            stock.push((outlet.clone(), idx));
        } else {
            debug!("no '{key} inventario' column in the data");
        }
    }

    Ok(Columns {
        name,
        category: find(&["categoria", "categoría", "category"]),
        brand: find(&["marca", "brand"]),
        net_total: find(&["total neto", "venta neta", "net total", "total"]),
        cost: find(&["costo", "cost"]),
        profit: find(&["ganancia", "utilidad", "profit"]),
        sold,
        stock,
    })
}

fn build_record(columns: &Columns, cells: &[String]) -> Option<ProductRecord> {
    let name = cells.get(columns.name)?.trim();
    if name.is_empty() {
        return None;
    }

    let text = |idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| cells.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let number = |idx: Option<usize>| -> f64 {
        idx.and_then(|i| cells.get(i))
            .and_then(|s| coerce_numeric(s))
            .unwrap_or(0.0)
    };
    let outlet_map = |pairs: &[(String, usize)]| {
        pairs
            .iter()
            .map(|(outlet, i)| {
                let value = cells.get(*i).and_then(|s| coerce_numeric(s)).unwrap_or(0.0);
                (outlet.clone(), value)
            })
            .collect()
    };

    Some(ProductRecord {
        name: name.to_string(),
        category: text(columns.category),
        brand: text(columns.brand),
        net_total: number(columns.net_total),
        cost: number(columns.cost),
        profit: number(columns.profit),
        units_sold: outlet_map(&columns.sold),
        inventory_on_hand: outlet_map(&columns.stock),
    })
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Strips currency symbols, thousands separators and percent signs before
// parsing. Anything still unparseable counts as missing, never as an error.
fn coerce_numeric(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Nombre,Categoria,Marca,Total Neto,Costo,Ganancia,Porcentaje,Centro Vendido,Centro Inventario,Norte Vendido,Norte Inventario
Cafe 500g,Abarrotes,Lavazza,\"$1,250.00\",$750.00,$500.00,40%,30,12,15,4
Azucar 1kg,Abarrotes,Zulka,620.50,430.00,190.50,30.7%,22,8,,
Jabon,Limpieza,Zote,80,55,25,31%,n/a,3,5,1
,,,ignored,row,without,name,1,2,3,4
";

    fn outlets() -> Vec<String> {
        vec!["Centro".to_string(), "Norte".to_string()]
    }

    #[test]
    fn loads_and_coerces_sample_csv() {
        let records = load_csv(SAMPLE_CSV.as_bytes(), "test.csv", &outlets()).unwrap();
        assert_eq!(records.len(), 3);

        let cafe = &records[0];
        assert_eq!(cafe.name, "Cafe 500g");
        assert_eq!(cafe.category.as_deref(), Some("Abarrotes"));
        assert_eq!(cafe.brand.as_deref(), Some("Lavazza"));
        assert!((cafe.net_total - 1250.0).abs() < 1e-9);
        assert!((cafe.cost - 750.0).abs() < 1e-9);
        assert!((cafe.units_sold_at("Centro") - 30.0).abs() < 1e-9);
        assert!((cafe.inventory_at("Norte") - 4.0).abs() < 1e-9);
    }

    #[test]
    fn unparseable_and_blank_cells_become_zero() {
        let records = load_csv(SAMPLE_CSV.as_bytes(), "test.csv", &outlets()).unwrap();
        let azucar = &records[1];
        // blank "Norte Vendido"/"Norte Inventario" cells
        assert_eq!(azucar.units_sold_at("Norte"), 0.0);
        assert_eq!(azucar.inventory_at("Norte"), 0.0);
        assert!(azucar.units_sold.contains_key("Norte"));

        let jabon = &records[2];
        // "n/a" is not a number
        assert_eq!(jabon.units_sold_at("Centro"), 0.0);
    }

    #[test]
    fn rows_without_a_name_are_skipped() {
        let records = load_csv(SAMPLE_CSV.as_bytes(), "test.csv", &outlets()).unwrap();
        assert!(records.iter().all(|r| !r.name.is_empty()));
    }

    #[test]
    fn headers_match_case_and_whitespace_insensitively() {
        let csv_data = "\
  NOMBRE ,  categoria,TOTAL   NETO,centro   VENDIDO
Cafe,Abarrotes,100,5
";
        let records = load_csv(csv_data.as_bytes(), "test.csv", &outlets()).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].net_total - 100.0).abs() < 1e-9);
        assert!((records[0].units_sold_at("Centro") - 5.0).abs() < 1e-9);
    }

    #[test]
    fn missing_name_column_is_a_load_error() {
        let csv_data = "Categoria,Costo\nAbarrotes,10\n";
        let err = load_csv(csv_data.as_bytes(), "test.csv", &outlets()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "nombre"));
    }

    #[test]
    fn absent_outlet_columns_leave_no_map_entry() {
        let csv_data = "Nombre,Centro Vendido\nCafe,12\n";
        let records = load_csv(csv_data.as_bytes(), "test.csv", &outlets()).unwrap();
        assert!(records[0].units_sold.contains_key("Centro"));
        assert!(!records[0].units_sold.contains_key("Norte"));
        assert!(!records[0].inventory_on_hand.contains_key("Centro"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_records("datos.txt", &outlets()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn coercion_handles_decorated_numbers() {
        assert_eq!(coerce_numeric("$1,234.50"), Some(1234.5));
        assert_eq!(coerce_numeric(" 35% "), Some(35.0));
        assert_eq!(coerce_numeric("-12.5"), Some(-12.5));
        assert_eq!(coerce_numeric("n/a"), None);
        assert_eq!(coerce_numeric(""), None);
    }
}
