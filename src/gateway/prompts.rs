//! Prompt templates for the two AI operations.

use crate::{entities::financial_record, errors::Result};

/// Prompt asking for a one-paragraph summary of a customer's records.
pub fn summary_prompt(customer_id: &str, records: &[financial_record::Model]) -> Result<String> {
    let records_json = serde_json::to_string_pretty(records)?;
    Ok(format!(
        "You are an assistant that summarizes a business customer's financial records.\n\n\
         Summarize the following financial records for customer ID {customer_id} in a single \
         paragraph. Mention the overall balance, notable invoices, payments, refunds or credits, \
         and any payment pattern worth knowing.\n\n\
         Records (JSON):\n{records_json}\n\n\
         Respond with JSON containing a `summary` string."
    ))
}

/// Prompt asking for a key-record judgment and insight per record.
#[must_use]
pub fn highlight_prompt(records: &[financial_record::Model]) -> String {
    let mut prompt = String::from(
        "You are a financial analysis assistant. Review the financial records below and \
         highlight the ones that deserve attention because of their size, the customer's \
         history, unusual activity or anything else relevant.\n\n\
         For every record decide whether it is a key record and give a concise insight \
         explaining why.\n\nFinancial records:\n",
    );
    for record in records {
        prompt.push_str(&format!(
            "  - ID: {}, Customer ID: {}, Date: {}, Amount: {}, Type: {}, Description: {}\n",
            record.id,
            record.customer_id,
            record.date,
            record.amount,
            record.record_type,
            record.description
        ));
    }
    prompt.push_str(
        "\nReturn JSON with a `highlightedRecords` array holding one entry per record above: \
         its `id`, an `isKeyRecord` boolean and an optional `aiInsight` string.",
    );
    prompt
}
