// src/common/time.rs

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Colômbia não tem horário de verão: UTC-5 fixo.
const COL_WEST_SECS: i32 = 5 * 3600;

pub fn col_tz() -> FixedOffset {
    FixedOffset::west_opt(COL_WEST_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn to_col(fecha: DateTime<Utc>) -> DateTime<FixedOffset> {
    fecha.with_timezone(&col_tz())
}

/// Carimbo usado nos relatórios: `2025-06-01 09:30:00`.
pub fn fecha_reporte(fecha: DateTime<Utc>) -> String {
    to_col(fecha).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Sufixo dos nomes de arquivo exportados: `2025-06-01_09-30-00`.
pub fn sello_archivo(ahora: DateTime<Utc>) -> String {
    to_col(ahora).format("%Y-%m-%d_%H-%M-%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn converte_para_horario_da_colombia() {
        let utc = Utc.with_ymd_and_hms(2025, 6, 1, 3, 15, 0).unwrap();
        assert_eq!(fecha_reporte(utc), "2025-05-31 22:15:00");
        assert_eq!(sello_archivo(utc), "2025-05-31_22-15-00");
        assert_eq!(to_col(utc).to_rfc3339(), "2025-05-31T22:15:00-05:00");
    }
}
