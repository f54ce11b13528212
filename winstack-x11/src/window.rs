//! X window wrapper.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_long, c_uchar, c_uint, c_ulong, c_void};
use std::{ptr, slice};

use log::*;
use x11_dl::xlib;

use crate::atoms::names;
use crate::context::DisplayContext;

/// `_NET_WM_STATE` action removing a state.
pub const STATE_REMOVE: c_long = 0;
/// `_NET_WM_STATE` action adding a state.
pub const STATE_ADD: c_long = 1;

/// ICCCM `WM_STATE` values.
pub const WM_STATE_WITHDRAWN: c_ulong = 0;
pub const WM_STATE_NORMAL: c_ulong = 1;
pub const WM_STATE_ICONIC: c_ulong = 3;

/// Source indication for client messages sent on behalf of an application.
const SOURCE_APPLICATION: c_long = 1;

/// Upper bound on property lengths read, in 32 bit units.
const MAX_PROPERTY_LENGTH: c_long = 4096;

/// Window title bytes, tagged with their encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Utf8(Vec<u8>),
    /// ICCCM `STRING`, which is ISO-8859-1.
    Latin1(Vec<u8>),
}

/// Value bytes of a format 8 text property.
fn text_property_bytes(property: &xlib::XTextProperty) -> Vec<u8> {
    unsafe { slice::from_raw_parts(property.value, property.nitems as usize) }.to_vec()
}

/// Convert a text property to UTF-8 through Xlib's converters.
fn text_property_to_utf8(
    context: &DisplayContext,
    property: &mut xlib::XTextProperty,
) -> Option<Vec<u8>> {
    let xlib = context.get_raw_context();
    let mut list: *mut *mut c_char = ptr::null_mut();
    let mut count: c_int = 0;

    let status = unsafe {
        (xlib.Xutf8TextPropertyToTextList)(context.get_connection(), property, &mut list, &mut count)
    };
    if status < 0 || list.is_null() {
        debug!("Could not convert text property with encoding {}", property.encoding);
        return None;
    }

    let mut text = Vec::new();
    for item in unsafe { slice::from_raw_parts(list, count.max(0) as usize) } {
        if !item.is_null() {
            text.extend_from_slice(unsafe { CStr::from_ptr(*item) }.to_bytes());
        }
    }
    unsafe { (xlib.XFreeStringList)(list) };
    Some(text)
}

/// Position and size of a window, with the position in root coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Decoration sizes added around a client by the window manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameExtents {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// An X window owned by some other client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    xid: xlib::Window,
}

impl Window {
    /// Wrap an existing X window.
    pub fn from_xid(xid: xlib::Window) -> Self {
        Self { xid }
    }

    /// Get XID of the window.
    pub fn get_xid(&self) -> xlib::Window {
        self.xid
    }

    /// Get all window attributes, or `None` if the window no longer exists.
    pub fn get_attributes(&self, context: &DisplayContext) -> Option<xlib::XWindowAttributes> {
        let xlib = context.get_raw_context();
        let mut attributes: xlib::XWindowAttributes = unsafe { std::mem::zeroed() };
        let status = unsafe {
            (xlib.XGetWindowAttributes)(context.get_connection(), self.xid, &mut attributes)
        };
        (status != 0).then(|| attributes)
    }

    /// Read a property and hand its raw data to `read`.
    ///
    /// Returns `None` if the property does not exist or could not be read.
    fn read_property<T>(
        &self,
        context: &DisplayContext,
        property: xlib::Atom,
        req_type: xlib::Atom,
        read: impl FnOnce(c_int, usize, *const c_uchar) -> T,
    ) -> Option<T> {
        let xlib = context.get_raw_context();

        let mut actual_type: xlib::Atom = 0;
        let mut actual_format: c_int = 0;
        let mut item_count: c_ulong = 0;
        let mut bytes_after: c_ulong = 0;
        let mut data: *mut c_uchar = ptr::null_mut();

        let status = unsafe {
            (xlib.XGetWindowProperty)(
                context.get_connection(),
                self.xid,
                property,
                0,
                MAX_PROPERTY_LENGTH,
                xlib::False,
                req_type,
                &mut actual_type,
                &mut actual_format,
                &mut item_count,
                &mut bytes_after,
                &mut data,
            )
        };

        if status != 0 || data.is_null() {
            return None;
        }

        let value = (actual_type != 0).then(|| read(actual_format, item_count as usize, data));
        unsafe { (xlib.XFree)(data as *mut c_void) };
        value
    }

    /// Read a format 32 property. Xlib hands these out as `long`s regardless of
    /// the platform's word size.
    pub fn get_property_longs(
        &self,
        context: &DisplayContext,
        property: xlib::Atom,
        req_type: xlib::Atom,
    ) -> Option<Vec<c_ulong>> {
        self.read_property(context, property, req_type, |format, count, data| {
            if format != 32 {
                return Vec::new();
            }
            unsafe { slice::from_raw_parts(data as *const c_ulong, count) }.to_vec()
        })
    }

    /// Read a format 8 property.
    pub fn get_property_bytes(
        &self,
        context: &DisplayContext,
        property: xlib::Atom,
        req_type: xlib::Atom,
    ) -> Option<Vec<u8>> {
        self.read_property(context, property, req_type, |format, count, data| {
            if format != 8 {
                return Vec::new();
            }
            unsafe { slice::from_raw_parts(data, count) }.to_vec()
        })
    }

    /// Get list of child windows.
    pub fn get_children(&self, context: &DisplayContext) -> Vec<Window> {
        let xlib = context.get_raw_context();

        let mut root: xlib::Window = 0;
        let mut parent: xlib::Window = 0;
        let mut children: *mut xlib::Window = ptr::null_mut();
        let mut count: c_uint = 0;

        let status = unsafe {
            (xlib.XQueryTree)(
                context.get_connection(),
                self.xid,
                &mut root,
                &mut parent,
                &mut children,
                &mut count,
            )
        };

        if status == 0 || children.is_null() {
            return Vec::new();
        }

        let windows = unsafe { slice::from_raw_parts(children, count as usize) }
            .iter()
            .copied()
            .map(Window::from_xid)
            .collect();
        unsafe { (xlib.XFree)(children as *mut c_void) };
        windows
    }

    /// Raw title, preferring the UTF-8 `_NET_WM_NAME` over `WM_NAME`.
    pub fn get_title(&self, context: &DisplayContext) -> Option<Title> {
        let net_name = self
            .get_property_bytes(
                context,
                context.atom(names::_NET_WM_NAME),
                context.atom(names::UTF8_STRING),
            )
            .filter(|name| !name.is_empty());
        match net_name {
            Some(name) => Some(Title::Utf8(name)),
            None => self.get_wm_name(context),
        }
    }

    /// ICCCM `WM_NAME`, in whichever encoding the client declared.
    fn get_wm_name(&self, context: &DisplayContext) -> Option<Title> {
        let xlib = context.get_raw_context();
        let mut property: xlib::XTextProperty = unsafe { std::mem::zeroed() };
        let status =
            unsafe { (xlib.XGetWMName)(context.get_connection(), self.xid, &mut property) };
        if status == 0 || property.value.is_null() {
            return None;
        }

        let title = if property.format != 8 {
            None
        } else if property.encoding == xlib::XA_STRING {
            Some(Title::Latin1(text_property_bytes(&property)))
        } else if property.encoding == context.atom(names::UTF8_STRING) {
            Some(Title::Utf8(text_property_bytes(&property)))
        } else {
            // COMPOUND_TEXT and anything else Xlib knows how to convert.
            text_property_to_utf8(context, &mut property).map(Title::Utf8)
        };

        unsafe { (xlib.XFree)(property.value as *mut c_void) };
        title
    }

    /// Process id of the owning client, from `_NET_WM_PID`.
    pub fn get_pid(&self, context: &DisplayContext) -> Option<u32> {
        self.get_property_longs(context, context.atom(names::_NET_WM_PID), xlib::XA_CARDINAL)
            .and_then(|values| values.first().map(|pid| *pid as u32))
    }

    /// The window this one is transient for, if any.
    pub fn get_transient_for(&self, context: &DisplayContext) -> Option<Window> {
        let xlib = context.get_raw_context();
        let mut owner: xlib::Window = 0;
        let status = unsafe {
            (xlib.XGetTransientForHint)(context.get_connection(), self.xid, &mut owner)
        };
        (status != 0 && owner != 0).then(|| Window::from_xid(owner))
    }

    /// Whether the client accepts keyboard input, per its `WM_HINTS`.
    pub fn accepts_input(&self, context: &DisplayContext) -> bool {
        let xlib = context.get_raw_context();
        let hints = unsafe { (xlib.XGetWMHints)(context.get_connection(), self.xid) };
        if hints.is_null() {
            return true;
        }

        let accepts = unsafe { (*hints).flags & xlib::InputHint == 0 || (*hints).input != 0 };
        unsafe { (xlib.XFree)(hints as *mut c_void) };
        accepts
    }

    /// ICCCM `WM_STATE` value, if the property is set.
    pub fn get_wm_state(&self, context: &DisplayContext) -> Option<c_ulong> {
        let wm_state = context.atom(names::WM_STATE);
        self.get_property_longs(context, wm_state, wm_state)
            .and_then(|values| values.first().copied())
    }

    /// Atoms currently set in `_NET_WM_STATE`.
    pub fn get_net_state(&self, context: &DisplayContext) -> Vec<xlib::Atom> {
        self.get_property_longs(context, context.atom(names::_NET_WM_STATE), xlib::XA_ATOM)
            .unwrap_or_default()
    }

    /// Whether `_NET_WM_STATE` holds the named state.
    pub fn has_net_state(&self, context: &DisplayContext, state: &'static str) -> bool {
        self.get_net_state(context).contains(&context.atom(state))
    }

    /// Whether the window is iconified.
    pub fn is_iconic(&self, context: &DisplayContext) -> bool {
        self.get_wm_state(context) == Some(WM_STATE_ICONIC)
            || self.has_net_state(context, names::_NET_WM_STATE_HIDDEN)
    }

    /// Whether the window is maximized along both axes.
    pub fn is_maximized(&self, context: &DisplayContext) -> bool {
        let states = self.get_net_state(context);
        states.contains(&context.atom(names::_NET_WM_STATE_MAXIMIZED_VERT))
            && states.contains(&context.atom(names::_NET_WM_STATE_MAXIMIZED_HORZ))
    }

    /// Decorations the window manager draws around this window.
    pub fn get_frame_extents(&self, context: &DisplayContext) -> FrameExtents {
        let extents = self
            .get_property_longs(context, context.atom(names::_NET_FRAME_EXTENTS), xlib::XA_CARDINAL)
            .unwrap_or_default();

        match extents[..] {
            [left, right, top, bottom] => FrameExtents {
                left: left as i32,
                right: right as i32,
                top: top as i32,
                bottom: bottom as i32,
            },
            _ => FrameExtents::default(),
        }
    }

    /// Get dimensions, and position of the window relative to the root window.
    pub fn get_geometry(&self, context: &DisplayContext) -> Option<Geometry> {
        let attributes = self.get_attributes(context)?;
        let xlib = context.get_raw_context();

        let mut x: c_int = 0;
        let mut y: c_int = 0;
        let mut child: xlib::Window = 0;
        let translated = unsafe {
            (xlib.XTranslateCoordinates)(
                context.get_connection(),
                self.xid,
                attributes.root,
                0,
                0,
                &mut x,
                &mut y,
                &mut child,
            )
        };

        (translated != 0).then(|| Geometry {
            x,
            y,
            width: attributes.width.max(0) as u32,
            height: attributes.height.max(0) as u32,
        })
    }

    /// Move and resize the window.
    pub fn move_resize(&self, context: &DisplayContext, geometry: Geometry) {
        unsafe {
            (context.get_raw_context().XMoveResizeWindow)(
                context.get_connection(),
                self.xid,
                geometry.x,
                geometry.y,
                geometry.width.max(1),
                geometry.height.max(1),
            )
        };
    }

    /// Ask the window manager to iconify the window.
    pub fn iconify(&self, context: &DisplayContext) {
        unsafe {
            (context.get_raw_context().XIconifyWindow)(
                context.get_connection(),
                self.xid,
                context.get_default_screen(),
            )
        };
    }

    /// Map, raise and activate the window, de-iconifying it.
    pub fn activate(&self, context: &DisplayContext) {
        unsafe { (context.get_raw_context().XMapRaised)(context.get_connection(), self.xid) };
        context.send_client_message(
            self,
            names::_NET_ACTIVE_WINDOW,
            [SOURCE_APPLICATION, xlib::CurrentTime as c_long, 0, 0, 0],
        );
    }

    /// Add or remove up to two `_NET_WM_STATE` atoms.
    pub fn change_state(
        &self,
        context: &DisplayContext,
        action: c_long,
        first: &'static str,
        second: Option<&'static str>,
    ) {
        let second = second.map_or(0, |state| context.atom(state) as c_long);
        context.send_client_message(
            self,
            names::_NET_WM_STATE,
            [
                action,
                context.atom(first) as c_long,
                second,
                SOURCE_APPLICATION,
                0,
            ],
        );
    }

    /// Raise the window.
    pub fn raise(&self, context: &DisplayContext) {
        unsafe { (context.get_raw_context().XRaiseWindow)(context.get_connection(), self.xid) };
    }

    /// Ask the window manager to close the window.
    pub fn close(&self, context: &DisplayContext) {
        context.send_client_message(
            self,
            names::_NET_CLOSE_WINDOW,
            [xlib::CurrentTime as c_long, SOURCE_APPLICATION, 0, 0, 0],
        );
    }
}
