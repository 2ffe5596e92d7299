//! Notification core: the fluent [`MessageBuilder`] and its collaborator seams.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::domain::{Attachment, Channel, Message, Recipient, SenderId};

/// Boxed future returned by the collaborator seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque collaborator failure crossing a seam.
pub type BoxError = Box<dyn StdError + Send + Sync>;

const NO_RENDERER_MESSAGE: &str = "Please use one of the available methods for specifying how to render your sms (e.g. Text() or Template())";

/// Renders a template reference plus a typed model into final message text.
///
/// The model is handed over untouched; whether it must be serializable,
/// displayable, or anything else is the renderer's business.
pub trait TemplateRenderer<T>: Send + Sync {
    fn render<'a>(&'a self, path: &'a str, model: &'a T)
    -> BoxFuture<'a, Result<String, BoxError>>;
}

/// Delivers a fully-resolved message to a transport/gateway.
///
/// Subject, schedule date, and the schedule flag are transport-level
/// metadata and therefore travel next to the message, not inside it.
pub trait Notifier: Send + Sync {
    fn notify<'a>(
        &'a self,
        message: &'a Message,
        subject: Option<&'a str>,
        schedule_date: Option<&'a str>,
        is_schedule: bool,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

#[derive(Debug, thiserror::Error)]
/// Errors surfaced by [`MessageBuilder::send`].
///
/// Collaborator failures are forwarded transparently: display text and error
/// source are the collaborator's own.
pub enum SendError {
    /// Neither a literal body nor a template was configured.
    #[error("{}", NO_RENDERER_MESSAGE)]
    NoRendererConfigured,

    /// The template renderer failed; the notifier was never invoked.
    #[error(transparent)]
    Render(BoxError),

    /// The notifier failed to deliver the message.
    #[error(transparent)]
    Delivery(BoxError),
}

#[derive(Debug, Clone, Copy, Default)]
/// Renderer for callers that only ever send literal text.
///
/// Always fails; reaching it means a template was set without a real
/// renderer being wired in.
pub struct NoTemplates;

impl<T> TemplateRenderer<T> for NoTemplates {
    fn render<'a>(
        &'a self,
        path: &'a str,
        _model: &'a T,
    ) -> BoxFuture<'a, Result<String, BoxError>> {
        Box::pin(async move {
            Err(format!("no template renderer configured (requested {path})").into())
        })
    }
}

type BootHook<T> = Box<dyn FnOnce(MessageBuilder<T>) -> MessageBuilder<T> + Send>;

/// Fluent accumulator for one SMS notification, generic over the template
/// model type `T` (use `()` when no template is involved).
///
/// Every setter stores its value without validation and returns the builder
/// by value for chaining; validation lives in the domain constructors and in
/// [`MessageBuilder::send`], which consumes the builder.
///
/// If both a literal body and a template are set, the literal body wins
/// unconditionally.
pub struct MessageBuilder<T> {
    from: Option<SenderId>,
    recipients: Vec<Recipient>,
    subject: Option<String>,
    attachment: Option<Attachment>,
    is_schedule: bool,
    schedule_date: Option<String>,
    body: Option<String>,
    channel: Option<Channel>,
    template: Option<(String, T)>,
    boot: Option<BootHook<T>>,
}

impl<T> Default for MessageBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MessageBuilder<T> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            from: None,
            recipients: Vec::new(),
            subject: None,
            attachment: None,
            is_schedule: false,
            schedule_date: None,
            body: None,
            channel: None,
            template: None,
            boot: None,
        }
    }

    /// Set the sender id.
    pub fn from(mut self, from: SenderId) -> Self {
        self.from = Some(from);
        self
    }

    /// Set the destination recipients.
    pub fn recipients(mut self, recipients: Vec<Recipient>) -> Self {
        self.recipients = recipients;
        self
    }

    /// Set the message subject.
    ///
    /// The subject is transport-level metadata; it never becomes part of the
    /// serialized message body.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach a file to the message.
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Mark the message as scheduled and record an opaque date string.
    ///
    /// The date is neither parsed nor validated; a schedule flag without a
    /// date is allowed.
    pub fn schedule(mut self, is_schedule: bool, schedule_date: Option<String>) -> Self {
        self.is_schedule = is_schedule;
        self.schedule_date = schedule_date;
        self
    }

    /// Set the literal text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Restrict delivery to a single transport channel.
    pub fn channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Set a template path and the model to render it with.
    ///
    /// Mutually intended alternative to [`MessageBuilder::text`]; if both are
    /// set, the literal text wins.
    pub fn template(mut self, path: impl Into<String>, model: T) -> Self {
        self.template = Some((path.into(), model));
        self
    }

    /// Install a hook that runs once at the start of [`MessageBuilder::send`],
    /// before body resolution. The hook receives the builder and may adjust
    /// any field through the regular setters. No hook is installed by default.
    pub fn on_boot(
        mut self,
        hook: impl FnOnce(MessageBuilder<T>) -> MessageBuilder<T> + Send + 'static,
    ) -> Self {
        self.boot = Some(Box::new(hook));
        self
    }

    /// Resolve the body and hand the message to the notifier.
    ///
    /// Sequence: boot hook, body resolution (literal text first, then the
    /// template renderer), then one awaited [`Notifier::notify`] call. Any
    /// collaborator failure surfaces immediately; nothing is retried.
    ///
    /// Errors: [`SendError::NoRendererConfigured`] when neither a literal
    /// body nor a template is present (the notifier is never invoked),
    /// [`SendError::Render`] and [`SendError::Delivery`] forwarding
    /// collaborator failures.
    pub async fn send<R, N>(mut self, renderer: &R, notifier: &N) -> Result<(), SendError>
    where
        R: TemplateRenderer<T> + ?Sized,
        N: Notifier + ?Sized,
    {
        if let Some(boot) = self.boot.take() {
            self = boot(self);
        }

        let body = self.resolve_body(renderer).await?;

        let message = Message::new(
            self.from,
            self.recipients,
            self.channel,
            body,
            self.attachment,
        );
        notifier
            .notify(
                &message,
                self.subject.as_deref(),
                self.schedule_date.as_deref(),
                self.is_schedule,
            )
            .await
            .map_err(SendError::Delivery)
    }

    async fn resolve_body<R>(&self, renderer: &R) -> Result<String, SendError>
    where
        R: TemplateRenderer<T> + ?Sized,
    {
        if let Some(text) = &self.body {
            return Ok(text.clone());
        }
        if let Some((path, model)) = &self.template {
            return renderer.render(path, model).await.map_err(SendError::Render);
        }
        Err(SendError::NoRendererConfigured)
    }
}

impl<T: fmt::Debug> fmt::Debug for MessageBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBuilder")
            .field("from", &self.from)
            .field("recipients", &self.recipients)
            .field("subject", &self.subject)
            .field("attachment", &self.attachment)
            .field("is_schedule", &self.is_schedule)
            .field("schedule_date", &self.schedule_date)
            .field("body", &self.body)
            .field("channel", &self.channel)
            .field("template", &self.template)
            .field("boot", &self.boot.is_some())
            .finish()
    }
}
