//! Notification message templates.

/// Title of the notification raised when a course is added to a cart.
pub const CART_ADD_TITLE: &str = "Course added to cart";

/// Subject of the matching email.
pub const CART_ADD_EMAIL_SUBJECT: &str = "Course Added to Cart";

/// Shortest decimal form of a price: `75` for whole amounts, `49.5` otherwise.
pub fn format_price(price: f64) -> String {
    format!("{price}")
}

/// In-app message body for a cart addition.
pub fn cart_add_message(course_name: &str, price: f64) -> String {
    format!(
        "You added {course_name} (₹{}) to your cart.",
        format_price(price)
    )
}

/// Plain-text email body for a cart addition.
pub fn cart_add_email_body(user_name: &str, course_name: &str, price: f64) -> String {
    format!(
        "Hi {user_name},\n\nYou added {course_name} (₹{}) to your cart.\n\nThank you for using EduVillage.",
        format_price(price)
    )
}
