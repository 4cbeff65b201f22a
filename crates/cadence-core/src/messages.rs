//! Localized error messages.
//!
//! Rendering is a pure function of (locale, error). Nothing is stored between
//! calls, so threads rendering in different locales never interfere.

use crate::error::CoreError;
use crate::locale::Locale;

/// Message templates of one locale. `{name}` marks a placeholder.
#[derive(Debug)]
struct Catalog {
    freq_required: &'static str,
    until_and_count: &'static str,
    invalid_rule_part: &'static str,
    unknown_rule_key: &'static str,
    invalid_rule_value: &'static str,
    dtstart_required: &'static str,
    unsupported_freq: &'static str,
    too_many_occurrences: &'static str,
    invalid_instant: &'static str,
    date_out_of_range: &'static str,
    invalid_natural_language: &'static str,
    unsupported_locale: &'static str,
}

const EN: Catalog = Catalog {
    freq_required: "FREQ is required in a recurrence rule.",
    until_and_count: "UNTIL and COUNT cannot both be specified.",
    invalid_rule_part: "Invalid recurrence rule part: {part}",
    unknown_rule_key: "Unknown recurrence rule key: {key}",
    invalid_rule_value: "Invalid value for recurrence rule key {key}: {value}",
    dtstart_required: "DTSTART is required to generate dates.",
    unsupported_freq: "Unsupported FREQ: {freq}",
    too_many_occurrences: "Too many occurrences for this rule {rule}",
    invalid_instant: "Cannot parse the date or time: {input}",
    date_out_of_range: "Date arithmetic left the supported range after {instant}",
    invalid_natural_language: "Cannot parse the natural language input: {input}",
    unsupported_locale: "NLP is not fully supported for locale: {locale}",
};

const DE: Catalog = Catalog {
    freq_required: "FREQ ist erforderlich in einer Wiederholungsregel.",
    until_and_count: "UNTIL und COUNT können nicht gleichzeitig angegeben werden.",
    invalid_rule_part: "Ungültiger Teil der Wiederholungsregel: {part}",
    unknown_rule_key: "Unbekannter Schlüssel der Wiederholungsregel: {key}",
    invalid_rule_value: "Ungültiger Wert für den Schlüssel {key}: {value}",
    dtstart_required: "DTSTART ist erforderlich, um Daten zu generieren.",
    unsupported_freq: "Nicht unterstützte FREQ: {freq}",
    too_many_occurrences: "Zu viele Wiederholungen für diese Regel {rule}",
    invalid_instant: "Datum oder Uhrzeit konnte nicht gelesen werden: {input}",
    date_out_of_range: "Datumsberechnung hat den unterstützten Bereich nach {instant} verlassen",
    invalid_natural_language:
        "Eingabe in natürlicher Sprache konnte nicht analysiert werden: {input}",
    unsupported_locale: "NLP wird für die Sprache {locale} nicht vollständig unterstützt.",
};

const ES: Catalog = Catalog {
    freq_required: "FREQ es requerido en una regla de repetición.",
    until_and_count: "UNTIL y COUNT no pueden especificarse simultáneamente.",
    invalid_rule_part: "Parte de la regla de repetición inválida: {part}",
    unknown_rule_key: "Clave de la regla de repetición desconocida: {key}",
    invalid_rule_value: "Valor inválido para la clave {key}: {value}",
    dtstart_required: "DTSTART es necesario para generar fechas.",
    unsupported_freq: "FREQ no soportada: {freq}",
    too_many_occurrences: "Demasiadas repeticiones para esta regla {rule}",
    invalid_instant: "No se pudo leer la fecha u hora: {input}",
    date_out_of_range: "El cálculo de fechas salió del rango soportado después de {instant}",
    invalid_natural_language: "No se pudo analizar la entrada en lenguaje natural: {input}",
    unsupported_locale: "NLP no está completamente soportado para el idioma {locale}.",
};

const FR: Catalog = Catalog {
    freq_required: "FREQ est requis pour une règle de récurrence.",
    until_and_count: "UNTIL et COUNT ne peuvent pas être spécifiés simultanément.",
    invalid_rule_part: "Partie de la règle de récurrence invalide: {part}",
    unknown_rule_key: "Clé de la règle de récurrence inconnue: {key}",
    invalid_rule_value: "Valeur invalide pour la clé {key}: {value}",
    dtstart_required: "DTSTART est nécessaire pour générer des dates.",
    unsupported_freq: "FREQ non supportée: {freq}",
    too_many_occurrences: "Trop d'occurrences pour cette règle {rule}",
    invalid_instant: "Impossible de lire la date ou l'heure: {input}",
    date_out_of_range: "Le calcul de date a quitté la plage prise en charge après {instant}",
    invalid_natural_language: "Impossible d'analyser l'entrée en langue naturelle: {input}",
    unsupported_locale: "NLP n'est pas entièrement pris en charge pour la langue {locale}.",
};

const IT: Catalog = Catalog {
    freq_required: "FREQ è richiesto in una regola di ripetizione.",
    until_and_count: "UNTIL e COUNT non possono essere specificati contemporaneamente.",
    invalid_rule_part: "Parte della regola di ripetizione non valida: {part}",
    unknown_rule_key: "Chiave della regola di ripetizione sconosciuta: {key}",
    invalid_rule_value: "Valore non valido per la chiave {key}: {value}",
    dtstart_required: "DTSTART è necessario per generare date.",
    unsupported_freq: "FREQ non supportata: {freq}",
    too_many_occurrences: "Troppe ripetizioni per questa regola {rule}",
    invalid_instant: "Impossibile leggere la data o l'ora: {input}",
    date_out_of_range: "Il calcolo della data ha superato l'intervallo supportato dopo {instant}",
    invalid_natural_language: "Impossibile analizzare l'input in lingua naturale: {input}",
    unsupported_locale: "NLP non è completamente supportato per la lingua {locale}.",
};

fn catalog(locale: Locale) -> &'static Catalog {
    match locale {
        Locale::En => &EN,
        Locale::De => &DE,
        Locale::Es => &ES,
        Locale::Fr => &FR,
        Locale::It => &IT,
    }
}

/// Renders `error` in `locale`, falling back to English for unknown locales.
pub fn message(locale: &str, error: &CoreError) -> String {
    let catalog = catalog(Locale::from_tag(locale).unwrap_or_default());
    let (template, arguments) = template(catalog, error);
    render(template, &arguments)
}

fn template<'e>(
    catalog: &Catalog,
    error: &'e CoreError,
) -> (&'static str, Vec<(&'static str, &'e str)>) {
    match error {
        CoreError::FreqRequired => (catalog.freq_required, vec![]),
        CoreError::UntilAndCountBothSet => (catalog.until_and_count, vec![]),
        CoreError::InvalidRulePart(part) => (catalog.invalid_rule_part, vec![("part", part.as_str())]),
        CoreError::UnknownRuleKey(key) => (catalog.unknown_rule_key, vec![("key", key.as_str())]),
        CoreError::InvalidRuleValue { key, value } => (
            catalog.invalid_rule_value,
            vec![("key", key.as_str()), ("value", value.as_str())],
        ),
        CoreError::DtStartRequired => (catalog.dtstart_required, vec![]),
        CoreError::UnsupportedFreq(freq) => (catalog.unsupported_freq, vec![("freq", freq.as_str())]),
        CoreError::TooManyOccurrences(rule) => {
            (catalog.too_many_occurrences, vec![("rule", rule.as_str())])
        }
        CoreError::InvalidInstant(input) => (catalog.invalid_instant, vec![("input", input.as_str())]),
        CoreError::DateOutOfRange(instant) => {
            (catalog.date_out_of_range, vec![("instant", instant.as_str())])
        }
        CoreError::InvalidNaturalLanguageInput(input) => {
            (catalog.invalid_natural_language, vec![("input", input.as_str())])
        }
        CoreError::UnsupportedLocale(locale) => {
            (catalog.unsupported_locale, vec![("locale", locale.as_str())])
        }
    }
}

fn render(template: &str, arguments: &[(&str, &str)]) -> String {
    arguments
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}
