/// Folds a category display name into a filename stem
///
/// Lower-cases the name, folds the Portuguese accented vowels and cedilla to
/// plain ASCII, and replaces spaces, hyphens and slashes with underscores.
/// Any other character is kept as-is.
///
/// # Examples
///
/// ```
/// use exam_harvest::url::category_file_stem;
///
/// assert_eq!(category_file_stem("Técnico de Enfermagem"), "tecnico_de_enfermagem");
/// assert_eq!(
///     category_file_stem("Analista Judiciário - Medicina"),
///     "analista_judiciario___medicina"
/// );
/// ```
pub fn category_file_stem(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| match c {
            'ã' | 'á' | 'â' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            ' ' | '-' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name() {
        assert_eq!(category_file_stem("Vigia"), "vigia");
    }

    #[test]
    fn test_accents_folded() {
        assert_eq!(
            category_file_stem("Agente Comunitário de Saúde"),
            "agente_comunitario_de_saude"
        );
        assert_eq!(category_file_stem("Administração"), "administracao");
        assert_eq!(category_file_stem("Topógrafo"), "topografo");
    }

    #[test]
    fn test_separators() {
        assert_eq!(category_file_stem("A/B\\C-D E"), "a_b_c_d_e");
    }

    #[test]
    fn test_uppercase_accents_are_lowered_first() {
        assert_eq!(category_file_stem("ÁREA"), "area");
    }
}
