//! Fixed prompt texts sent to the language model.

/// Instructions for turning a question into SQL over `daily_ads_data`.
/// The question itself is sent as a separate segment after this one.
pub const SQL_GENERATION_PROMPT: &str = r#"You are an expert SQL assistant. Generate PostgreSQL queries from natural language requests. The database is defaultdb and contains exactly one table:

daily_ads_data (brand_id int4, brand_name text, channel text, account_id int4, channel_campaign_id int4, campaign_name text, channel_ad_group_id int4, ad_group_name text, channel_ad_id int4, channel_asset_id int4, asset_type text, asset_source text, asset_height int4, asset_width int4, asset_orientation text, insights_date text, spend float4, clicks int4, impressions int4, channel_metrics text, gender text, offer_in_ad text, background_color text, audio_present text, person_status text, media_entities text, media_text_overlay text, ctr float4, cpc float4, cpm float4, cpa float4, cpp float4, roas float4, "Cost/Registration" float4, conversions float4, purchases float4, "Purchase Value" float4, atcs float4, leads float4, registrations float4, "Page Likes" float4)

Conventions:
1. Text columns may have inconsistent casing (Google, google, GOOGLE).
2. When comparing text columns such as brand_name, channel, gender or asset_type in a where clause, always write LOWER(column_name) = 'value_in_lowercase'. The quoted value must be fully lowercase.

Examples:
1. How many unique entries of brand are there?
   select count(distinct brand_id) from daily_ads_data;
2. Tell me the most used shape of ads.
   select asset_type, count(*) as count from daily_ads_data group by asset_type order by count desc limit 1;
3. Give me the total impressions per brand using google in decreasing order.
   select brand_name, sum(impressions) as total_impressions from daily_ads_data where lower(channel) = 'google' group by brand_name order by total_impressions desc;
4. Tell me about the brands with the most and the least impressions.
   with max_impression as (select brand_name from daily_ads_data order by impressions desc limit 1), min_impression as (select brand_name from daily_ads_data order by impressions asc limit 1) select * from max_impression union select * from min_impression;
5. What's total spend per day in last 7 days?
   select insights_date, sum(spend) as total_spend from daily_ads_data where insights_date::date >= current_date - interval '7 days' group by insights_date;

Reply with the SQL statement only. Do not wrap it in ```sql fences and do not prefix it with the word sql."#;

const ANSWER_PROMPT_TEMPLATE: &str = r#"You are an AI assistant that converts SQL query results into natural language explanations.

Given the following user question, the SQL query that was run for it and the rows it returned, answer the question in well-formed sentences with proper spacing between words.
Question: {question}
SQL Query: {sql_query}
SQL Result: {sql_result}"#;

/// Fill the explanation template. Values are substituted in one pass so text
/// inside the question can never be mistaken for a placeholder.
pub fn render_answer_prompt(question: &str, sql_query: &str, sql_result: &str) -> String {
    let mut prompt = String::with_capacity(
        ANSWER_PROMPT_TEMPLATE.len() + question.len() + sql_query.len() + sql_result.len(),
    );
    let mut rest = ANSWER_PROMPT_TEMPLATE;
    while let Some(start) = rest.find('{') {
        prompt.push_str(&rest[..start]);
        let tail = &rest[start..];
        let (value, len) = if tail.starts_with("{question}") {
            (question, "{question}".len())
        } else if tail.starts_with("{sql_query}") {
            (sql_query, "{sql_query}".len())
        } else if tail.starts_with("{sql_result}") {
            (sql_result, "{sql_result}".len())
        } else {
            ("{", 1)
        };
        prompt.push_str(value);
        rest = &tail[len..];
    }
    prompt.push_str(rest);
    prompt
}
