//! [`CartApi`] over the remote REST API.

use crate::api::CartApi;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use trip_cache::CredentialStore;
use trip_commerce::booking::BookingRequest;
use trip_commerce::cart::{Activity, BookingDate, LineItem};
use trip_commerce::{ActivityId, Currency, LineItemId, Money};
use trip_data::{ClientConfig, ClientRequestBuilder, FetchClient, FetchError, Response};

/// Cart API backed by [`FetchClient`].
///
/// The API key travels as a default header from [`ClientConfig`]; the bearer
/// token is read from the [`CredentialStore`] on every request so a login or
/// logout takes effect immediately.
#[derive(Debug, Clone)]
pub struct HttpCartApi {
    client: FetchClient,
    credentials: CredentialStore,
    currency: Currency,
}

impl HttpCartApi {
    pub fn new(client: FetchClient, credentials: CredentialStore) -> Self {
        Self {
            client,
            credentials,
            currency: Currency::default(),
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        credentials: CredentialStore,
    ) -> Result<Self, FetchError> {
        Ok(Self::new(FetchClient::from_config(config)?, credentials))
    }

    /// Currency that amounts returned by the server are interpreted in.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    fn authorize(&self, request: ClientRequestBuilder) -> ClientRequestBuilder {
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn item_from_dto(&self, dto: CartItemDto) -> Option<LineItem> {
        let nested = dto.activity.unwrap_or_default();

        let Some(id) = dto.id.map(Lenient::into_string) else {
            tracing::warn!("skipping cart item without an id");
            return None;
        };
        let Some(activity_id) = dto
            .activity_id
            .or(nested.id)
            .map(Lenient::into_string)
            .filter(|s| !s.trim().is_empty())
        else {
            tracing::warn!(line_item_id = %id, "skipping cart item without an activity id");
            return None;
        };
        let quantity = match dto.quantity.and_then(|q| q.as_i64()) {
            Some(q) if q >= 1 => u32::try_from(q).unwrap_or(u32::MAX),
            other => {
                tracing::warn!(line_item_id = %id, quantity = ?other, "skipping cart item with invalid quantity");
                return None;
            }
        };

        let price = dto
            .price
            .or(nested.price)
            .and_then(|p| p.as_i64())
            .unwrap_or_default();
        let discounted = dto
            .discounted_price
            .or(nested.discounted_price)
            .and_then(|p| p.as_i64());

        let mut item = LineItem::new(
            LineItemId::new(id),
            ActivityId::new(activity_id),
            quantity,
            Money::new(price, self.currency),
        );
        if let Some(title) = dto.title.or(nested.title) {
            item = item.with_title(title);
        }
        if let Some(amount) = discounted {
            item = item.with_discounted_price(Money::new(amount, self.currency));
        }
        if let Some(dates) = dto.booking_date.and_then(|d| d.parse()) {
            item = item.with_booking_date(dates);
        }
        Some(item)
    }
}

/// Check the HTTP status and the envelope code of a mutation response.
fn check(response: Response) -> Result<(), FetchError> {
    let envelope = response.envelope()?.error_for_code()?;
    if !response.is_success() {
        return Err(FetchError::HttpError {
            status: response.status,
            message: envelope.message,
        });
    }
    Ok(())
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn list_cart(&self) -> Result<Vec<LineItem>, FetchError> {
        let response = self.authorize(self.client.get("carts")).send().await?;
        let dtos: Option<Vec<CartItemDto>> = response.data()?;
        Ok(dtos
            .unwrap_or_default()
            .into_iter()
            .filter_map(|dto| self.item_from_dto(dto))
            .collect())
    }

    async fn get_activity(&self, id: &ActivityId) -> Result<Activity, FetchError> {
        let response = self
            .authorize(self.client.get(format!("activity/{id}")))
            .send()
            .await?;
        let dto: Option<ActivityDto> = response.data()?;
        let Some(dto) = dto else {
            return Err(FetchError::Api {
                code: 404,
                message: format!("Activity {id} not found"),
            });
        };

        let price = dto.price.and_then(|p| p.as_i64()).unwrap_or_default();
        Ok(Activity {
            id: dto
                .id
                .map(|v| ActivityId::new(v.into_string()))
                .unwrap_or_else(|| id.clone()),
            title: dto.title.unwrap_or_default(),
            price: Money::new(price, self.currency),
            discounted_price: dto
                .discounted_price
                .and_then(|p| p.as_i64())
                .map(|amount| Money::new(amount, self.currency)),
        })
    }

    async fn add_to_cart(&self, request: &BookingRequest) -> Result<(), FetchError> {
        let response = self
            .authorize(self.client.post("add-cart"))
            .json(request)?
            .send()
            .await?;
        check(response)
    }

    async fn update_cart(&self, id: &LineItemId, quantity: u32) -> Result<(), FetchError> {
        let response = self
            .authorize(self.client.post(format!("update-cart/{id}")))
            .json(&json!({ "quantity": quantity }))?
            .send()
            .await?;
        check(response)
    }

    async fn delete_cart(&self, id: &LineItemId) -> Result<(), FetchError> {
        let response = self
            .authorize(self.client.delete(format!("delete-cart/{id}")))
            .send()
            .await?;
        check(response)
    }
}

// Wire shapes. The backend is inconsistent about field names and number
// encodings, so everything is optional and checked after decoding.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemDto {
    #[serde(default)]
    id: Option<Lenient>,
    #[serde(default, alias = "activity_id")]
    activity_id: Option<Lenient>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    quantity: Option<Lenient>,
    #[serde(default)]
    price: Option<Lenient>,
    #[serde(default, alias = "price_discount")]
    discounted_price: Option<Lenient>,
    #[serde(default, alias = "booking_date")]
    booking_date: Option<BookingDateDto>,
    #[serde(default)]
    activity: Option<ActivityDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivityDto {
    #[serde(default)]
    id: Option<Lenient>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    price: Option<Lenient>,
    #[serde(default, alias = "price_discount")]
    discounted_price: Option<Lenient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingDateDto {
    #[serde(default, alias = "check_in")]
    check_in: Option<String>,
    #[serde(default, alias = "check_out")]
    check_out: Option<String>,
}

impl BookingDateDto {
    fn parse(self) -> Option<BookingDate> {
        let (check_in, check_out) = (self.check_in?, self.check_out?);
        match BookingDate::parse(&check_in, &check_out) {
            Ok(dates) => Some(dates),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unusable booking date");
                None
            }
        }
    }
}

/// A scalar that may arrive as an integer, a float or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Lenient {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Lenient::Int(n) => Some(*n),
            Lenient::Float(f) if f.is_finite() => Some(f.round() as i64),
            Lenient::Float(_) => None,
            Lenient::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.round() as i64)
                })
            }
        }
    }

    fn into_string(self) -> String {
        match self {
            Lenient::Int(n) => n.to_string(),
            Lenient::Float(f) => f.to_string(),
            Lenient::Text(s) => s,
        }
    }
}
