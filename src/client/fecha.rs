// src/client/fecha.rs

use chrono::{DateTime, FixedOffset};

pub const MSG_FORMATO_INVALIDO: &str = "Formato de fecha inválido";

/// `dd/mm/yyyy HH:MM` no fuso que veio da API (UTC-5).
pub fn formatear(fecha: &DateTime<FixedOffset>) -> String {
    fecha.format("%d/%m/%Y %H:%M").to_string()
}

/// Mesma formatação partindo do texto RFC 3339 do JSON.
pub fn formatear_str(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|f| formatear(&f))
        .unwrap_or_else(|_| MSG_FORMATO_INVALIDO.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mantem_o_horario_local_da_api() {
        assert_eq!(formatear_str("2025-03-09T17:05:00-05:00"), "09/03/2025 17:05");
    }

    #[test]
    fn texto_invalido() {
        assert_eq!(formatear_str("ontem"), MSG_FORMATO_INVALIDO);
        assert_eq!(formatear_str(""), MSG_FORMATO_INVALIDO);
    }
}
