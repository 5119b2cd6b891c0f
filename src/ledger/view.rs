//! HTML rendering for the ledger page.

use maud::{Markup, PreEscaped, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    alert::{ALERT_CONTAINER_ID, Alert},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
        format_percentage, format_signed_currency, loading_spinner,
    },
    metrics::{MAX_RATIO, Metrics, compute_metrics},
    timezone::to_local_time,
    transaction::Transaction,
};

/// The ID of the element holding the summary and the table, swapped after every change.
pub(crate) const LEDGER_ID: &str = "ledger";
/// The ID of the dialog holding the form for adding a transaction.
const ADD_DIALOG_ID: &str = "add-transaction-dialog";
/// The ID of the form for adding a transaction.
const ADD_FORM_ID: &str = "add-transaction-form";

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const CREATED_AT_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day] [month repr:short] [year], [hour]:[minute]");

/// Settings that change how amounts and dates are shown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DisplayOptions<'a> {
    /// The canonical name of the timezone to show timestamps in.
    pub local_timezone: &'a str,
    /// The symbol shown in front of amounts.
    pub currency_symbol: &'a str,
}

/// The whole page: header, ledger and the dialog for adding a transaction.
///
/// `alert` is shown above the ledger, e.g. when the transactions could not be loaded.
pub(crate) fn ledger_page(
    transactions: &[Transaction],
    alert: Option<Alert>,
    options: DisplayOptions<'_>,
) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    div class="flex gap-2"
                    {
                        button
                            type="button"
                            hx-get=(endpoints::ROOT)
                            hx-target={"#" (LEDGER_ID)}
                            hx-swap="outerHTML"
                            hx-target-error={"#" (ALERT_CONTAINER_ID)}
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Refresh"
                        }

                        button
                            type="button"
                            onclick={"document.getElementById('" (ADD_DIALOG_ID) "').showModal()"}
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Add transaction"
                        }
                    }
                }

                @if let Some(alert) = alert {
                    (alert.into_html())
                }

                (ledger_fragment(transactions, options))
            }
        }

        (add_transaction_dialog())
    };

    base("Transactions", &[dialog_script()], &content)
}

/// The summary cards, ratio bar and transaction table for `transactions`.
pub(crate) fn ledger_fragment(transactions: &[Transaction], options: DisplayOptions<'_>) -> Markup {
    let metrics = compute_metrics(transactions);

    html! {
        div id=(LEDGER_ID) class="space-y-6"
        {
            (summary_cards(&metrics, options.currency_symbol))
            (ratio_bar(metrics.ratio))
            (transactions_table(transactions, options))

            @if metrics.coerced_amounts > 0 {
                p class="text-xs text-gray-500 dark:text-gray-400" data-coerced-amounts=(metrics.coerced_amounts)
                {
                    (metrics.coerced_amounts)
                    " transaction(s) have an amount that could not be read and are counted as "
                    (format_currency(0.0, options.currency_symbol))
                    "."
                }
            }
        }
    }
}

fn summary_cards(metrics: &Metrics, currency_symbol: &str) -> Markup {
    let balance_style = if metrics.balance >= 0.0 {
        "text-blue-600 dark:text-blue-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    let card = |id: &str, label: &str, value: String, style: &str| {
        html! {
            div id=(id) class=(CARD_STYLE)
            {
                p class="text-sm text-gray-600 dark:text-gray-400 mb-1" { (label) }
                p class={"text-2xl font-bold " (style)} { (value) }
            }
        }
    };

    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
        {
            (card("balance", "Balance", format_currency(metrics.balance, currency_symbol), balance_style))
            (card(
                "income",
                "Income",
                format_currency(metrics.income, currency_symbol),
                "text-green-600 dark:text-green-400",
            ))
            (card(
                "expense",
                "Expenses",
                format_currency(metrics.expense, currency_symbol),
                "text-red-600 dark:text-red-400",
            ))
            (card(
                "ratio",
                "Expenses/Income",
                format_percentage(metrics.ratio),
                "text-purple-600 dark:text-purple-400",
            ))
        }
    }
}

fn ratio_bar(ratio: f64) -> Markup {
    let ratio = ratio.clamp(0.0, MAX_RATIO);

    html! {
        section class=(CARD_STYLE)
        {
            div class="flex justify-between items-center mb-2"
            {
                span class="font-medium" { "Expenses/Income ratio" }
                span class="font-semibold text-purple-600 dark:text-purple-400" { (format_percentage(ratio)) }
            }

            progress class="w-full h-4" value=(ratio) max=(MAX_RATIO) { (format_percentage(ratio)) }

            div class="flex justify-between text-xs text-gray-500 mt-1"
            {
                span { "0%" }
                span { "50%" }
                span { "100%" }
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction], options: DisplayOptions<'_>) -> Markup {
    html! {
        section class="rounded bg-white dark:bg-gray-800 overflow-x-auto shadow-md"
        {
            h2 class="text-lg font-semibold p-4" { "History" }

            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "#" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for (index, transaction) in transactions.iter().enumerate() {
                        (transaction_row(index + 1, transaction, options))
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions recorded yet."
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(number: usize, transaction: &Transaction, options: DisplayOptions<'_>) -> Markup {
    let amount = transaction.amount.value_or_zero();
    let (indicator, amount_style) = if amount > 0.0 {
        ("▲", "text-green-700 dark:text-green-300")
    } else {
        ("▼", "text-red-700 dark:text-red-300")
    };
    let (description, full_description) = format_description(&transaction.description);
    let delete_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id.as_str());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE) { (number) }

            td class=(TABLE_CELL_STYLE) title=[full_description] { (description) }

            td class={(TABLE_CELL_STYLE) " font-semibold " (amount_style)}
            {
                span aria-hidden="true" class="me-1" { (indicator) }
                (format_signed_currency(amount, options.currency_symbol))
            }

            td class=(TABLE_CELL_STYLE) { (format_created_at(transaction, options.local_timezone)) }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={"Are you sure you want to delete '" (transaction.description) "'?"}
                    hx-target={"#" (LEDGER_ID)}
                    hx-swap="outerHTML"
                    hx-target-error={"#" (ALERT_CONTAINER_ID)}
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn add_transaction_dialog() -> Markup {
    html! {
        dialog
            id=(ADD_DIALOG_ID)
            class="m-auto w-full max-w-md rounded-lg p-6 bg-white dark:bg-gray-800 text-gray-900 dark:text-white backdrop:backdrop-blur-sm"
        {
            div class="flex justify-between items-center mb-6"
            {
                h2 class="text-xl font-bold" { "Add transaction" }

                button
                    type="button"
                    aria-label="Close"
                    class="cursor-pointer"
                    onclick="this.closest('dialog').close()"
                {
                    "✕"
                }
            }

            form
                id=(ADD_FORM_ID)
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target={"#" (LEDGER_ID)}
                hx-swap="outerHTML"
                hx-target-error={"#" (ALERT_CONTAINER_ID)}
                hx-indicator="#indicator"
                hx-disabled-elt="find button[type=submit]"
                class="space-y-4"
            {
                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        type="text"
                        name="description"
                        id="description"
                        placeholder="Enter a description..."
                        class=(FORM_TEXT_INPUT_STYLE)
                        required
                        autofocus;
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE)
                    {
                        "Amount "
                        span class="text-gray-500" { "(negative = expense, positive = income)" }
                    }

                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        placeholder="Enter an amount..."
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }

                button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    "Add"
                }
            }
        }
    }
}

/// Resets and closes the dialog once a transaction has been added.
fn dialog_script() -> HeadElement {
    HeadElement::ScriptSource(PreEscaped(format!(
        r#"
        document.addEventListener("htmx:afterRequest", (event) => {{
            const form = event.detail.elt;
            if (form.id === "{ADD_FORM_ID}" && event.detail.successful) {{
                form.reset();
                form.closest("dialog").close();
            }}
        }});
        "#
    )))
}

/// Show `transaction`'s creation time in the local timezone, or the raw value
/// from the store if it cannot be parsed.
fn format_created_at(transaction: &Transaction, local_timezone: &str) -> String {
    transaction
        .created_at_utc()
        .and_then(|created_at| {
            to_local_time(created_at, local_timezone)
                .format(CREATED_AT_FORMAT)
                .ok()
        })
        .unwrap_or_else(|| transaction.created_at.clone())
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        alert::Alert,
        endpoints,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form, text_of,
        },
        transaction::{Amount, Transaction, TransactionId},
    };

    use super::{
        DisplayOptions, format_created_at, format_description, ledger_fragment, ledger_page,
    };

    const OPTIONS: DisplayOptions<'static> = DisplayOptions {
        local_timezone: "Etc/UTC",
        currency_symbol: "$",
    };

    fn transaction(id: &str, description: &str, amount: Amount) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: description.to_owned(),
            amount,
            created_at: "2025-03-01T10:15:00Z".to_owned(),
        }
    }

    fn render_fragment(transactions: &[Transaction]) -> Html {
        let html = Html::parse_fragment(&ledger_fragment(transactions, OPTIONS).into_string());
        assert_valid_html(&html);
        html
    }

    fn card_value(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("#{id} p:nth-child(2)")).unwrap();
        let element = html
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No card with id {id}"));

        text_of(&element)
    }

    fn table_rows(html: &Html) -> Vec<Vec<String>> {
        let row_selector = Selector::parse("tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        html.select(&row_selector)
            .map(|row| row.select(&cell_selector).map(|cell| text_of(&cell)).collect())
            .collect()
    }

    #[test]
    fn summary_shows_metrics() {
        let html = render_fragment(&[
            transaction("1", "Pay", Amount::Number(100.0)),
            transaction("2", "Rent", Amount::Number(-40.0)),
        ]);

        assert_eq!(card_value(&html, "balance"), "$60.00");
        assert_eq!(card_value(&html, "income"), "$100.00");
        assert_eq!(card_value(&html, "expense"), "$40.00");
        assert_eq!(card_value(&html, "ratio"), "40%");
    }

    #[test]
    fn progress_bar_is_capped() {
        let html = render_fragment(&[
            transaction("1", "Pay", Amount::Number(10.0)),
            transaction("2", "Car", Amount::Number(-1000.0)),
        ]);

        let progress = html
            .select(&Selector::parse("progress").unwrap())
            .next()
            .expect("No progress bar found");
        assert_eq!(progress.value().attr("value"), Some("100"));
        assert_eq!(progress.value().attr("max"), Some("100"));
    }

    #[test]
    fn negative_balance_is_red() {
        let html = render_fragment(&[transaction("1", "Rent", Amount::Number(-30.0))]);

        let balance = html
            .select(&Selector::parse("#balance p:nth-child(2)").unwrap())
            .next()
            .unwrap();
        let class = balance.value().attr("class").unwrap_or_default();
        assert!(class.contains("text-red-600"), "got class {class:?}");
    }

    #[test]
    fn table_lists_transactions_in_order() {
        let html = render_fragment(&[
            transaction("b", "Pay", Amount::Number(100.0)),
            transaction("a", "Rent", Amount::Number(-40.0)),
        ]);

        let rows = table_rows(&html);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[0][1], "Pay");
        assert_eq!(rows[0][2], "▲+$100.00");
        assert_eq!(rows[0][3], "01 Mar 2025, 10:15");
        assert_eq!(rows[1][0], "2");
        assert_eq!(rows[1][2], "▼-$40.00");
    }

    #[test]
    fn delete_buttons_target_each_transaction() {
        let html = render_fragment(&[
            transaction("7", "Pay", Amount::Number(1.0)),
            transaction("x/y", "Odd id", Amount::Number(2.0)),
        ]);

        let buttons: Vec<_> = html
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .collect();

        assert_eq!(buttons.len(), 2);
        assert_hx_endpoint(&buttons[0], "/api/transactions/7", "hx-delete");
        assert_hx_endpoint(&buttons[1], "/api/transactions/x%2Fy", "hx-delete");
        assert_hx_endpoint(&buttons[0], "#ledger", "hx-target");
        assert_hx_endpoint(&buttons[0], "#alert-container", "hx-target-error");
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let html = render_fragment(&[]);

        let rows = table_rows(&html);

        assert_eq!(rows, vec![vec!["No transactions recorded yet.".to_owned()]]);
        assert_eq!(card_value(&html, "balance"), "$0.00");
        assert_eq!(card_value(&html, "ratio"), "0%");
    }

    #[test]
    fn malformed_amount_is_shown_as_zero_with_note() {
        let html = render_fragment(&[transaction("1", "Broken", Amount::Text("abc".to_owned()))]);

        let rows = table_rows(&html);
        assert_eq!(rows[0][2], "▼$0.00");

        let note = html
            .select(&Selector::parse("[data-coerced-amounts]").unwrap())
            .next()
            .expect("No note about unreadable amounts");
        assert_eq!(note.value().attr("data-coerced-amounts"), Some("1"));
    }

    #[test]
    fn no_note_when_all_amounts_are_numbers() {
        let html = render_fragment(&[transaction("1", "Pay", Amount::Number(1.0))]);

        assert!(
            html.select(&Selector::parse("[data-coerced-amounts]").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn page_has_add_form() {
        let html = Html::parse_document(&ledger_page(&[], None, OPTIONS).into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_hx_endpoint(&form, "#ledger", "hx-target");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
    }

    #[test]
    fn page_shows_alert() {
        let alert = Alert::Error {
            message: "Could not load transactions".to_owned(),
            details: "The store is down.".to_owned(),
        };

        let html = Html::parse_document(&ledger_page(&[], Some(alert), OPTIONS).into_string());

        let alert = html
            .select(&Selector::parse("main [role=alert] p").unwrap())
            .next()
            .expect("No alert found");
        assert_eq!(text_of(&alert), "Could not load transactions");
    }

    #[test]
    fn created_at_uses_local_timezone() {
        let transaction = transaction("1", "Pay", Amount::Number(1.0));

        assert_eq!(
            format_created_at(&transaction, "Pacific/Auckland"),
            "01 Mar 2025, 23:15"
        );
    }

    #[test]
    fn unparseable_created_at_is_shown_as_is() {
        let mut transaction = transaction("1", "Pay", Amount::Number(1.0));
        transaction.created_at = "last tuesday".to_owned();

        assert_eq!(format_created_at(&transaction, "Etc/UTC"), "last tuesday");
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let long = "A very long description that goes on and on";

        let (shown, full) = format_description(long);

        assert_eq!(shown, "A very long description that ...");
        assert_eq!(full, Some(long));
        assert_eq!(format_description("Short"), ("Short".to_owned(), None));
    }
}
