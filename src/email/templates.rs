//! Plain-text bodies for customer emails.

use rust_decimal::Decimal;

use super::EmailMessage;
use crate::models::{Order, OrderStatus};

/// Formats an amount as rupees with Indian digit grouping, e.g. `₹1,23,456.00`.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = if whole.len() <= 3 {
        whole.to_string()
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups = Vec::new();
        let mut end = head.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            groups.push(&head[start..end]);
            end = start;
        }
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    format!("{sign}₹{grouped}.{fraction}")
}

pub fn order_confirmation(order: &Order) -> EmailMessage {
    let items: String = order
        .items
        .iter()
        .map(|item| {
            let line_total = item.price * Decimal::from(item.quantity);
            format!(
                "  {} x {} @ {} = {}\n",
                item.quantity,
                item.name,
                format_inr(item.price),
                format_inr(line_total)
            )
        })
        .collect();

    let body = format!(
        "Dear {name},\n\n\
         Thank you for your order! We've received it and will start preparing it right away.\n\n\
         Order ID: {id}\n\
         Order date: {date}\n\
         Payment method: {method}\n\n\
         {items}\n\
         Subtotal: {subtotal}\n\
         Shipping: {shipping}\n\
         Total:    {total}\n\n\
         Shipping address:\n  \
         {name}\n  \
         {address}\n  \
         {city}, {state} {pin}\n  \
         Phone: {phone}\n\n\
         We'll send you another email with tracking information once your order ships.\n\
         {SIGNATURE}",
        name = order.customer_name,
        id = order.id,
        date = order.created_at.format("%d %b %Y"),
        method = order.payment_method.to_uppercase(),
        subtotal = format_inr(order.subtotal),
        shipping = format_inr(order.shipping),
        total = format_inr(order.total),
        address = order.shipping_address,
        city = order.city,
        state = order.state,
        pin = order.pin_code,
        phone = order.customer_phone,
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Confirmation - {}", order.id),
        body,
    }
}

pub fn status_update(
    order: &Order,
    old_status: OrderStatus,
    tracking_number: Option<&str>,
) -> EmailMessage {
    let headline = match order.order_status {
        OrderStatus::Pending => "We've received your order and it's being processed.".to_string(),
        OrderStatus::Processing => "Your order is currently being prepared with care.".to_string(),
        OrderStatus::Shipped => match tracking_number {
            Some(tracking) => {
                format!("Great news! Your order has been shipped with tracking number: {tracking}.")
            }
            None => "Great news! Your order has been shipped.".to_string(),
        },
        OrderStatus::Delivered => {
            "Your order has been delivered successfully. We hope you love your new jewelry!"
                .to_string()
        }
    };
    let tracking = tracking_number
        .map(|tracking| format!("Tracking number: {tracking}\n"))
        .unwrap_or_default();

    let body = format!(
        "Dear {name},\n\n\
         {headline}\n\n\
         Order ID: {id}\n\
         Status: {old_status} -> {new_status}\n\
         {tracking}\
         Total: {total}\n\
         {SIGNATURE}",
        name = order.customer_name,
        id = order.id,
        new_status = order.order_status,
        total = format_inr(order.total),
    );

    EmailMessage {
        to: order.customer_email.clone(),
        subject: format!("Order Status Update - {}", order.id),
        body,
    }
}

const SIGNATURE: &str = "\nIf you have any questions about your order, just reply to this email.\n\n\
                         Radheya Alankara\n\
                         Exquisite Jewelry for Every Occasion";
