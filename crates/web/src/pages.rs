//! Server-rendered HTML for the welcome and data-entry screens.

use chrono::NaiveDate;
use driver_log_core::application::entry_form::{
    EntryFormInput, FieldError, FormErrors, FormField, FORM_DATE_FORMAT,
};
use driver_log_core::domain::driver::{
    entry::EntryType,
    session::{DriverSession, SessionError},
};
use strum::IntoEnumIterator;

use crate::notice::{Notice, NoticeKind};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f4f4f5;margin:0;padding:2rem 1rem}\
main{max-width:28rem;margin:0 auto;background:#fff;border-radius:.5rem;padding:1.5rem;\
box-shadow:0 1px 3px rgba(0,0,0,.1)}\
h1{font-size:1.25rem;margin-top:0}\
label{display:block;font-weight:600;margin-bottom:.25rem}\
input,select{width:100%;box-sizing:border-box;padding:.5rem;border:1px solid #d4d4d8;\
border-radius:.375rem}\
.field{margin-bottom:1rem}\
.error{color:#b91c1c;font-size:.875rem;margin:.25rem 0 0}\
.notice{border-radius:.375rem;padding:.75rem;margin-bottom:1rem}\
.notice p{margin:.25rem 0 0}\
.notice-success{background:#dcfce7;color:#166534}\
.notice-error{background:#fee2e2;color:#991b1b}\
button{width:100%;padding:.6rem;border:0;border-radius:.375rem;background:#18181b;color:#fff}\
[hidden]{display:none}";

const TOGGLE_SCRIPT: &str = "\
const entryType=document.getElementById('entryType');\
function syncFields(){document.querySelectorAll('[data-types]').forEach(function(el){\
el.hidden=!el.dataset.types.split(' ').includes(entryType.value);});}\
entryType.addEventListener('change',syncFields);";

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Path of the entry screen carrying the driver identity as query parameters.
pub fn entry_path(session: &DriverSession) -> String {
    format!(
        "/data-entry?username={}&carNumber={}",
        urlencoding::encode(session.name()),
        urlencoding::encode(session.vehicle_id())
    )
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"ru\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{}</title><style>{STYLE}</style></head><body><main>{body}</main></body></html>",
        escape_html(title)
    )
}

fn error_line(message: Option<String>) -> String {
    message.map_or_else(String::new, |message| {
        format!("<p class=\"error\">{}</p>", escape_html(&message))
    })
}

fn session_error(errors: &[SessionError], wanted: &SessionError) -> Option<String> {
    errors
        .iter()
        .find(|error| *error == wanted)
        .map(ToString::to_string)
}

pub fn welcome_page(username: &str, car_number: &str, errors: &[SessionError]) -> String {
    let body = format!(
        "<h1>Добро пожаловать в ООО \"ОПТИ-ТРАНС\"</h1>\
<form method=\"post\" action=\"/\">\
<div class=\"field\"><label for=\"username\">Имя</label>\
<input id=\"username\" name=\"username\" placeholder=\"Введите имя\" value=\"{}\">{}</div>\
<div class=\"field\"><label for=\"carNumber\">Гос. номер автобуса</label>\
<input id=\"carNumber\" name=\"carNumber\" placeholder=\"Введите гос. номер\" value=\"{}\">{}</div>\
<button type=\"submit\">Войти</button></form>",
        escape_html(username),
        error_line(session_error(errors, &SessionError::NameTooShort)),
        escape_html(car_number),
        error_line(session_error(errors, &SessionError::VehicleIdTooShort)),
    );
    layout("Вход", &body)
}

fn types_attr(types: &[EntryType]) -> String {
    types
        .iter()
        .map(|entry_type| entry_type.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

fn hidden_attr(types: &[EntryType], selected: Option<EntryType>) -> &'static str {
    match selected {
        Some(selected) if types.contains(&selected) => "",
        _ => " hidden",
    }
}

struct EntryPage<'a> {
    input: &'a EntryFormInput,
    errors: &'a FormErrors,
    selected: Option<EntryType>,
    html: String,
}

impl EntryPage<'_> {
    fn message(&self, field: FormField) -> String {
        error_line(self.errors.for_field(field).map(FieldError::to_string))
    }

    fn text_field(
        &mut self,
        field: FormField,
        types: &[EntryType],
        label: &str,
        placeholder: &str,
        value: &str,
    ) {
        let message = self.message(field);
        self.html.push_str(&format!(
            "<div class=\"field\" data-types=\"{}\"{}><label for=\"{name}\">{label}</label>\
<input id=\"{name}\" name=\"{name}\" placeholder=\"{placeholder}\" value=\"{}\">{message}</div>",
            types_attr(types),
            hidden_attr(types, self.selected),
            escape_html(value),
            name = field.as_ref(),
        ));
    }
}

/// Entry screen for `session`. `input` supplies the values to show, so a failed submission
/// keeps what the driver typed.
pub fn entry_page(
    session: &DriverSession,
    input: &EntryFormInput,
    errors: &FormErrors,
    notice: Option<Notice>,
    today: NaiveDate,
) -> String {
    let selected = input.entry_type();
    let mut page = EntryPage {
        input,
        errors,
        selected,
        html: String::new(),
    };

    page.html.push_str("<h1>Обязательная форма для водителей</h1>");
    page.html.push_str(&format!(
        "<p>{} · {}</p>",
        escape_html(session.name()),
        escape_html(session.vehicle_id())
    ));

    if let Some(notice) = notice {
        let class = match notice.kind {
            NoticeKind::Success => "notice-success",
            NoticeKind::Error => "notice-error",
        };
        page.html.push_str(&format!(
            "<div class=\"notice {class}\" role=\"status\"><strong>{}</strong><p>{}</p></div>",
            escape_html(notice.title),
            escape_html(notice.description)
        ));
    }

    page.html.push_str(&format!(
        "<form method=\"post\" action=\"{}\">",
        escape_html(&entry_path(session))
    ));

    let date_message = page.message(FormField::Date);
    page.html.push_str(&format!(
        "<div class=\"field\"><label for=\"date\">Дата</label>\
<input type=\"date\" id=\"date\" name=\"date\" min=\"1900-01-01\" max=\"{}\" value=\"{}\">{}</div>",
        today.format(FORM_DATE_FORMAT),
        escape_html(&page.input.date),
        date_message
    ));

    let mut options = String::from("<option value=\"\">Выбери действие</option>");
    for entry_type in EntryType::iter() {
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            entry_type.as_ref(),
            if selected == Some(entry_type) { " selected" } else { "" },
            entry_type.label()
        ));
    }
    let type_message = page.message(FormField::EntryType);
    page.html.push_str(&format!(
        "<div class=\"field\"><label for=\"entryType\">Выбери категорию</label>\
<select id=\"entryType\" name=\"entryType\">{options}</select>{type_message}</div>"
    ));

    let all = [EntryType::Morning, EntryType::Evening, EntryType::Refueling];
    page.text_field(
        FormField::MedicMarkTime,
        &[EntryType::Morning],
        "Во сколько поставил отметку медика",
        "Введите время",
        &input.medic_mark_time,
    );

    let tachograph_label = format!(
        "<span data-types=\"morning\"{}>Во сколько вставил карту тахографа</span>\
<span data-types=\"evening\"{}>Во сколько вытащил карту тахографа</span>",
        hidden_attr(&[EntryType::Morning], selected),
        hidden_attr(&[EntryType::Evening], selected),
    );
    page.text_field(
        FormField::TachographCardInsertionTime,
        &[EntryType::Morning, EntryType::Evening],
        &tachograph_label,
        "Введите время",
        &input.tachograph_card_insertion_time,
    );

    page.text_field(
        FormField::Mileage,
        &all,
        "Показание одометра",
        "Введите показания",
        &input.mileage,
    );
    page.text_field(
        FormField::FuelFilled,
        &[EntryType::Refueling],
        "Заправлено (литры)",
        "Введите литры",
        &input.fuel_filled,
    );

    page.html.push_str("<button type=\"submit\">Отправить</button></form>");
    page.html.push_str(&format!("<script>{TOGGLE_SCRIPT}</script>"));

    layout("Данные водителя", &page.html)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"O'Neil" & co</b>"#),
            "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;"
        );
    }

    #[test]
    fn test_entry_path_percent_encodes_identity() {
        let session = DriverSession::new("Иван Петров", "A 123&BC").unwrap();
        assert_eq!(
            entry_path(&session),
            "/data-entry?username=%D0%98%D0%B2%D0%B0%D0%BD%20%D0%9F%D0%B5%D1%82%D1%80%D0%BE%D0%B2\
&carNumber=A%20123%26BC"
        );
    }

    #[test]
    fn test_welcome_page_shows_field_errors_and_values() {
        let html = welcome_page("I", "<x>", &[SessionError::NameTooShort]);
        assert!(html.contains("Username must be at least 2 characters."));
        assert!(!html.contains("Car number must be at least 2 characters."));
        assert!(html.contains("value=\"&lt;x&gt;\""));
    }

    #[test]
    fn test_entry_page_shows_only_fields_of_selected_type() {
        let session = DriverSession::new("Ivanov", "A123BC").unwrap();
        let input = EntryFormInput {
            entry_type: "refueling".into(),
            fuel_filled: "40".into(),
            ..Default::default()
        };

        let html = entry_page(&session, &input, &FormErrors::default(), None, today());

        assert!(html.contains("<option value=\"refueling\" selected>Заправка</option>"));
        assert!(html.contains("data-types=\"refueling\"><label for=\"fuelFilled\">"));
        assert!(html.contains("data-types=\"morning\" hidden><label for=\"medicMarkTime\">"));
        assert!(html.contains("value=\"40\""));
        assert!(html.contains("action=\"/data-entry?username=Ivanov&amp;carNumber=A123BC\""));
        assert!(html.contains("max=\"2024-05-02\""));
    }

    #[test]
    fn test_entry_page_renders_notice() {
        let session = DriverSession::new("Ivanov", "A123BC").unwrap();
        let html = entry_page(
            &session,
            &EntryFormInput::default(),
            &FormErrors::default(),
            Some(Notice::SAVED),
            today(),
        );
        assert!(html.contains("notice-success"));
        assert!(html.contains("Your data has been successfully saved to the Google Sheet."));
    }
}
