//! Cross-module scenarios for a library session.
