// https://dictionaryapi.dev/ - free, no key, one array element per homograph

use reqwest::StatusCode;

use crate::{DictionaryError, NotFoundError, Word};

pub(crate) async fn get_definitions(
    client: &reqwest::Client,
    base_url: &str,
    word: &str,
) -> Result<Vec<Word>, DictionaryError> {
    let url = format!("{base_url}{word}");
    tracing::debug!(%url, "requesting definitions");
    let res: reqwest::Response = client.get(&url).send().await.map_err(DictionaryError::Fetch)?;
    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        // the body is informational only, a 404 is a miss whatever it says
        let not_found = res
            .json::<NotFoundError>()
            .await
            .unwrap_or_else(|_| NotFoundError::for_word(word));
        return Err(DictionaryError::NotFound(not_found));
    }
    if !status.is_success() {
        return Err(DictionaryError::Status(status));
    }
    res.json::<Vec<Word>>()
        .await
        .map_err(DictionaryError::Deserialize)
}
